use common::allotments::Allotment;

// (parent, allotted, quantity per parent, allotted unit, per parent unit, frequency)
type Rule = (&'static str, &'static str, u64, &'static str, &'static str, &'static str);

const RULES: [Rule; 20] = [
    ("Infrastructure Pro", "Custom Metrics", 100, "custom metrics", "host", "month"),
    ("Infrastructure Pro", "Ingested Custom Metrics", 100, "ingested custom metrics", "host", "month"),
    ("Infrastructure Enterprise", "Custom Metrics", 200, "custom metrics", "host", "month"),
    ("Infrastructure Enterprise", "Ingested Custom Metrics", 200, "ingested custom metrics", "host", "month"),
    ("APM", "Indexed Spans", 1_000_000, "indexed spans", "APM host", "month"),
    ("APM", "Ingested Spans", 150, "GB", "APM host", "month"),
    ("APM", "Profiled Hosts", 1, "profiled host", "APM host", "month"),
    ("APM", "Profiled Containers", 4, "profiled containers", "APM host", "hour"),
    ("APM Enterprise", "Indexed Spans", 1_000_000, "indexed spans", "APM host", "month"),
    ("APM Enterprise", "Ingested Spans", 150, "GB", "APM host", "month"),
    ("Database Monitoring", "Normalized Queries", 200, "queries", "database host", "month"),
    ("Continuous Profiler", "Profiled Containers", 4, "profiled containers", "profiled host", "hour"),
    ("Cloud Security Management Pro", "CSM Pro Containers", 5, "containers", "CSM host", "hour"),
    ("Cloud Security Management Pro", "Workflow Automation", 5, "executions", "CSM host", "month"),
    ("Cloud Security Management Enterprise", "CSM Enterprise Containers", 20, "containers", "CSM host", "hour"),
    ("Cloud Security Management Enterprise", "Workflow Automation", 20, "executions", "CSM host", "month"),
    ("Serverless Workload Monitoring - Functions", "Custom Metrics", 5, "custom metrics", "function", "month"),
    ("Serverless Workload Monitoring - Apps", "Custom Metrics", 20, "custom metrics", "instance app", "month"),
    ("Pipeline Visibility", "Pipeline Spans", 400_000, "spans", "committer", "month"),
    ("Test Optimization", "Test Spans", 1_000_000, "spans", "committer", "month"),
];

/// Known allotments, used when the allotments page cannot be read
pub fn manual_allotments() -> Vec<Allotment> {
    RULES
        .iter()
        .map(|(parent, allotted, quantity, unit, per_parent, frequency)| {
            Allotment::new(*parent, *allotted, *quantity, *unit)
                .with_per_parent_unit(*per_parent)
                .with_frequency(*frequency)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn pairs_are_unique() {
        let allotments = manual_allotments();
        let pairs = allotments
            .iter()
            .map(|a| (a.parent_product.as_str(), a.allotted_product.as_str()))
            .collect::<HashSet<(&str, &str)>>();

        assert_eq!(allotments.len(), 20);
        assert_eq!(pairs.len(), allotments.len());
    }

    #[test]
    fn infrastructure_pro_includes_custom_metrics() {
        let rule = manual_allotments()
            .into_iter()
            .find(|a| a.is_parent(None, "infrastructure pro") && a.is_allotted(None, "custom metrics"))
            .unwrap();

        assert_eq!(rule.quantity_per_parent, 100);
        assert_eq!(rule.per_parent_unit.as_deref(), Some("host"));
        assert_eq!(rule.frequency.as_deref(), Some("month"));
    }
}
