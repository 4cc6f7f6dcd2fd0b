//! Prometheus metrics for the goals API.
//!
//! [`GoalMetrics`] owns the registry and the three metric families the
//! service exports. It is created once at startup, shared behind an `Arc`,
//! and encoded in OpenMetrics text format by the `/metrics` handler.
//!
//! - `http_request_duration_ms{method, route, status_code}`: one observation
//!   per completed HTTP response
//! - `goals_operations_total{operation, status}`: one increment per store call
//! - `validation_errors_total{error_type}`: one increment per rejected create

use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::Histogram;
use prometheus_client::registry::Registry;

use crate::validation::ValidationError;

/// Content type of the `/metrics` response body.
pub const OPENMETRICS_CONTENT_TYPE: &str =
    "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// Request duration buckets in milliseconds.
const REQUEST_DURATION_BUCKETS: [f64; 10] = [
    50.0, 100.0, 200.0, 300.0, 400.0, 500.0, 750.0, 1000.0, 2000.0, 5000.0,
];

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct DurationLabels {
    pub method: String,
    /// Matched route template (e.g. `/goals/{id}`), or the raw path if no route matched.
    pub route: String,
    pub status_code: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OperationLabels {
    pub operation: String,
    pub status: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ValidationLabels {
    pub error_type: String,
}

/// A goal CRUD operation, as labelled on `goals_operations_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Create => "create",
            Operation::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Error => "error",
        }
    }
}

/// Registry plus handles to every metric family the service records into.
pub struct GoalMetrics {
    registry: Registry,
    request_duration_ms: Family<DurationLabels, Histogram>,
    operations_total: Family<OperationLabels, Counter>,
    validation_errors_total: Family<ValidationLabels, Counter>,
}

impl GoalMetrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let request_duration_ms = Family::<DurationLabels, Histogram>::new_with_constructor(|| {
            Histogram::new(REQUEST_DURATION_BUCKETS.iter().copied())
        });
        registry.register(
            "http_request_duration_ms",
            "Duration of HTTP requests in ms",
            request_duration_ms.clone(),
        );

        // Counter names get their `_total` suffix from the encoder.
        let operations_total = Family::<OperationLabels, Counter>::default();
        registry.register(
            "goals_operations",
            "Total number of goals operations",
            operations_total.clone(),
        );

        let validation_errors_total = Family::<ValidationLabels, Counter>::default();
        registry.register(
            "validation_errors",
            "Total number of validation errors",
            validation_errors_total.clone(),
        );

        Self {
            registry,
            request_duration_ms,
            operations_total,
            validation_errors_total,
        }
    }

    pub fn observe_request(&self, method: &str, route: &str, status_code: u16, duration_ms: f64) {
        self.request_duration_ms
            .get_or_create(&DurationLabels {
                method: method.to_string(),
                route: route.to_string(),
                status_code: status_code.to_string(),
            })
            .observe(duration_ms);
    }

    pub fn record_operation(&self, operation: Operation, outcome: Outcome) {
        self.operations_total
            .get_or_create(&operation_labels(operation, outcome))
            .inc();
    }

    pub fn record_validation_error(&self, error: ValidationError) {
        self.validation_errors_total
            .get_or_create(&ValidationLabels {
                error_type: error.label().to_string(),
            })
            .inc();
    }

    /// Current value of one operation counter.
    pub fn operation_count(&self, operation: Operation, outcome: Outcome) -> u64 {
        self.operations_total
            .get_or_create(&operation_labels(operation, outcome))
            .get()
    }

    /// Current value of one validation counter.
    pub fn validation_count(&self, error: ValidationError) -> u64 {
        self.validation_errors_total
            .get_or_create(&ValidationLabels {
                error_type: error.label().to_string(),
            })
            .get()
    }

    /// Render the registry in OpenMetrics text format.
    pub fn encode(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        prometheus_client::encoding::text::encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}

impl Default for GoalMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn operation_labels(operation: Operation, outcome: Outcome) -> OperationLabels {
    OperationLabels {
        operation: operation.as_str().to_string(),
        status: outcome.as_str().to_string(),
    }
}
