//! Report model
//!
//! Reports are opaque nested values handed back by the feed client. The
//! relay only cares about one field, the benchmark price, after the whole
//! tree has been normalized.

mod gateway;
mod normalize;
mod value;

pub use gateway::{ReportGateway, DEFAULT_FEED_ID};
pub use normalize::{is_normalized, normalize};
pub use value::{Value, MAX_SAFE_INTEGER};

/// A report as returned by the feed client
pub type Report = Value;

/// A report whose big-integer leaves have been converted to strings
pub type NormalizedReport = Value;

/// Field holding the benchmark price in decoded reports
pub const BENCHMARK_PRICE_FIELD: &str = "benchmarkPrice";

/// Extract the benchmark price from a report, or `Null` if absent
pub fn benchmark_price(report: &Value) -> Value {
    report
        .get(BENCHMARK_PRICE_FIELD)
        .cloned()
        .unwrap_or(Value::Null)
}
