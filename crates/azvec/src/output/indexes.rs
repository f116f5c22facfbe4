//! Index output formatting.

use azure_vector_store_rs::store::IndexStats;
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::header_line;

#[derive(Serialize)]
struct IndexNamesOutput<'a> {
    indexes: &'a [String],
}

#[derive(Serialize)]
struct IndexStatsOutput<'a> {
    name: &'a str,
    #[serde(flatten)]
    stats: &'a IndexStats,
}

/// Formats index names as JSON.
pub fn format_index_names_json(names: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&IndexNamesOutput { indexes: names })
}

/// Formats index names one per line.
pub fn format_index_names_table(names: &[String], use_colors: bool) -> String {
    if names.is_empty() {
        return "No indexes found.\n".to_string();
    }

    let mut output = header_line("Name", use_colors);
    for name in names {
        output.push_str(name);
        output.push('\n');
    }
    output
}

/// Formats index stats as JSON.
pub fn format_index_stats_json(name: &str, stats: &IndexStats) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&IndexStatsOutput { name, stats })
}

/// Formats index stats as labelled lines.
pub fn format_index_stats_table(name: &str, stats: &IndexStats, use_colors: bool) -> String {
    let title = if use_colors {
        name.bold().to_string()
    } else {
        name.to_string()
    };
    format!(
        "{title}\n  Dimension: {}\n  Documents: {}\n  Metric:    {}\n",
        stats.dimension,
        stats.count,
        stats.metric.service_name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use azure_vector_store_rs::store::Metric;

    fn stats() -> IndexStats {
        IndexStats {
            dimension: 768,
            count: 42,
            metric: Metric::DotProduct,
        }
    }

    #[test]
    fn test_index_names_table() {
        let names = vec!["alpha".to_string(), "beta".to_string()];
        assert_eq!(format_index_names_table(&names, false), "Name\nalpha\nbeta\n");
        assert_eq!(format_index_names_table(&[], false), "No indexes found.\n");
    }

    #[test]
    fn test_index_names_json() {
        let json = format_index_names_json(&["alpha".to_string()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["indexes"][0], "alpha");
    }

    #[test]
    fn test_index_stats_table() {
        let table = format_index_stats_table("products", &stats(), false);
        assert!(table.starts_with("products\n"));
        assert!(table.contains("Dimension: 768"));
        assert!(table.contains("Documents: 42"));
        assert!(table.contains("Metric:    dotProduct"));
    }

    #[test]
    fn test_index_stats_json() {
        let json = format_index_stats_json("products", &stats()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "products");
        assert_eq!(value["dimension"], 768);
        assert_eq!(value["count"], 42);
        assert_eq!(value["metric"], "dotproduct");
    }
}
