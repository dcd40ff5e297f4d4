use std::{env, sync::LazyLock};

use strum_macros::{Display, EnumIter};

static CONNECTION_URI: LazyLock<String> = LazyLock::new(|| {
    let host = env::var("PROMETHEUS_HOST").unwrap_or("localhost".into());
    let port = env::var("PROMETHEUS_PORT").unwrap_or("9090".into());

    format!("http://{host}:{port}/api/v1/otlp/v1/metrics")
});

// nothing is exported unless this is set, tests and local runs stay offline
static ENABLED: LazyLock<bool> =
    LazyLock::new(|| metrics_enabled(env::var("METRICS_ENABLED").ok().as_deref()));

const SERVICE_NAME: &str = "pricehound";

#[derive(Debug, Display, EnumIter, Hash, Eq, PartialEq, Clone, Copy)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Metrics {
    /// Counter for a region's price table being replaced
    PricingSynced,
    /// Counter for a region sync that failed or found nothing
    PricingSyncFailed,
    /// Counter for allotment rules being replaced
    AllotmentsSynced,
    QuoteCreated,
    QuoteUpdated,
    QuoteDeleted,
    /// Counter for a wrong or missing edit password on a protected quote
    QuotePasswordRejected,
}

fn metrics_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|value| matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
}

pub mod _private {
    pub use opentelemetry::KeyValue;

    use std::{collections::HashMap, sync::LazyLock, time::Duration};

    use opentelemetry::{
        global,
        metrics::{Counter, Meter},
    };
    use opentelemetry_otlp::{MetricExporter, Protocol, WithExportConfig};
    use opentelemetry_sdk::{
        Resource,
        metrics::{PeriodicReader, SdkMeterProvider},
    };
    use strum::IntoEnumIterator;

    use crate::{CONNECTION_URI, ENABLED, Metrics, SERVICE_NAME};

    static OTEL_METER: LazyLock<Meter> = LazyLock::new(|| {
        global::set_meter_provider(PROVIDER.clone());
        global::meter(SERVICE_NAME)
    });

    pub static PROVIDER: LazyLock<SdkMeterProvider> = LazyLock::new(|| {
        let exporter = MetricExporter::builder()
            .with_http()
            .with_protocol(Protocol::HttpBinary)
            .with_endpoint(CONNECTION_URI.to_string())
            .build()
            .expect("Expect Prometheus exporter to build");

        let reader = PeriodicReader::builder(exporter)
            .with_interval(Duration::from_secs(1))
            .build();

        let resource = Resource::builder().with_service_name(SERVICE_NAME).build();

        SdkMeterProvider::builder()
            .with_reader(reader)
            .with_resource(resource)
            .build()
    });

    pub static COUNTERS: LazyLock<HashMap<Metrics, Counter<u64>>> = LazyLock::new(|| {
        let mut mapping: HashMap<Metrics, Counter<u64>> = HashMap::new();

        for metric in crate::Metrics::iter() {
            let metric_meter = OTEL_METER.u64_counter(metric.to_string()).build();

            mapping.insert(metric, metric_meter);
        }

        mapping
    });

    pub fn enabled() -> bool {
        *ENABLED
    }
}

#[macro_export]
macro_rules! put_metric {
    ($metric_name:expr, $added_value:expr $(, $key:literal => $value:expr)* $(,)?) => {{
        use $crate::_private::{COUNTERS, KeyValue, enabled};
        use $crate::Metrics;

        let metric_name: Metrics = $metric_name;
        let added_value: u64 = $added_value;

        if enabled() {
            let attributes: &[KeyValue] = &[
                $(KeyValue::new($key, $value),)*
            ];

            if let Some(counter) = COUNTERS.get(&metric_name) {
                counter.add(added_value, attributes);
            }
        }
    }};
}
