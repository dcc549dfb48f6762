//! One probe run: collect serials, rank them, classify.

use dnssync_core::{compute_drift, CheckReport};
use dnssync_probe::{collect, DigSource, ResolverSource, SerialSource};
use tracing::{info, warn};

use crate::config::{Backend, Settings};

/// Build the serial source selected by `settings`.
fn source(settings: &Settings) -> Box<dyn SerialSource> {
    match settings.backend {
        Backend::Dig => Box::new(
            DigSource::new(&settings.dig).timeout(settings.probe.query_timeout),
        ),
        Backend::Resolver => Box::new(
            ResolverSource::new()
                .port(settings.port)
                .timeout(settings.probe.query_timeout)
                .concurrency(settings.probe.concurrency),
        ),
    }
}

/// Run the check. Probe failures become an UNKNOWN report.
pub async fn execute(settings: &Settings) -> CheckReport {
    let source = source(settings);

    let drift = collect(source.as_ref(), &settings.zone, &settings.mode, &settings.probe)
        .await
        .and_then(|records| compute_drift(&records, settings.arithmetic));

    let report = match drift {
        Ok(drift) => CheckReport::measured(drift, settings.thresholds, settings.display),
        Err(e) => {
            warn!(zone = %settings.zone, error = %e, "probe failed");
            CheckReport::failed(e.to_string())
        }
    };

    info!(
        zone = %settings.zone,
        status = %report.status,
        servers = report.metrics.len(),
        "check finished"
    );
    report
}
