use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the Prometheus recorder and describe all metrics
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metric_descriptions();
    Ok(handle)
}

fn init_metric_descriptions() {
    describe_counter!("studio_estimates_total", "Cost estimates computed");
    describe_counter!("studio_generations_total", "AI visualization requests by outcome");
    describe_histogram!(
        "studio_generation_duration_seconds",
        "Upstream generation latency in seconds"
    );
    describe_counter!("studio_credits_consumed_total", "Credits consumed");
    describe_counter!("studio_credits_purchased_total", "Credits added by completed checkouts");
    describe_counter!("studio_shares_created_total", "Design snapshots shared");
    describe_gauge!("studio_info", "Service version information");

    gauge!("studio_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

pub fn record_estimate(tier: &str, urgent: bool) {
    counter!(
        "studio_estimates_total",
        "tier" => tier.to_string(),
        "urgent" => urgent.to_string(),
    )
    .increment(1);
}

pub fn record_generation(outcome: &str, duration: Duration) {
    counter!("studio_generations_total", "outcome" => outcome.to_string()).increment(1);
    histogram!("studio_generation_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_credit_consumed(owner_kind: &str) {
    counter!("studio_credits_consumed_total", "owner" => owner_kind.to_string()).increment(1);
}

pub fn record_credits_purchased(amount: u32) {
    counter!("studio_credits_purchased_total").increment(u64::from(amount));
}

pub fn record_share_created() {
    counter!("studio_shares_created_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_estimate("standard", false);
        record_generation("success", Duration::from_millis(1200));
        record_credit_consumed("device");
        record_credits_purchased(10);
        record_share_created();
    }
}
