use serde::Serialize;

pub const DEFAULT_REGION: &str = "us1";

pub const PRICING_URL: &str = "https://www.datadoghq.com/pricing/list/";
pub const ALLOTMENTS_URL: &str = "https://www.datadoghq.com/pricing/allotments/";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Region {
    #[serde(skip)]
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    pub site: &'static str,
}

// every region shares the same public list page, the site is what differs
pub const REGIONS: [Region; 6] = [
    Region {
        id: "us1",
        name: "US1 (Virginia)",
        url: PRICING_URL,
        site: "datadoghq.com",
    },
    Region {
        id: "us3",
        name: "US3 (Virginia)",
        url: PRICING_URL,
        site: "us3.datadoghq.com",
    },
    Region {
        id: "us5",
        name: "US5 (Oregon)",
        url: PRICING_URL,
        site: "us5.datadoghq.com",
    },
    Region {
        id: "eu1",
        name: "EU1 (Frankfurt)",
        url: PRICING_URL,
        site: "datadoghq.eu",
    },
    Region {
        id: "ap1",
        name: "AP1 (Tokyo)",
        url: PRICING_URL,
        site: "ap1.datadoghq.com",
    },
    Region {
        id: "gov",
        name: "US1-FED (GovCloud)",
        url: PRICING_URL,
        site: "ddog-gov.com",
    },
];

pub fn find_region(id: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|region| region.id == id)
}

pub fn default_region() -> &'static Region {
    &REGIONS[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_region_is_in_table() {
        assert_eq!(default_region().id, DEFAULT_REGION);
        assert!(find_region(DEFAULT_REGION).is_some());
    }

    #[test]
    fn region_ids_are_unique() {
        for (index, region) in REGIONS.iter().enumerate() {
            assert!(
                REGIONS[index + 1..].iter().all(|other| other.id != region.id),
                "duplicate region {}",
                region.id
            );
        }
    }

    #[test]
    fn unknown_region_is_none() {
        assert!(find_region("mars1").is_none());
        assert_eq!(find_region("eu1").map(|r| r.site), Some("datadoghq.eu"));
    }
}
