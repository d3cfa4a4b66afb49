//! Report rendering.
//!
//! Turns a finished [`Report`] into console text, Markdown or JSON. Nothing
//! here computes statistics; every number comes from the report as is.

use crate::models::{CarrierStatistics, LobBreakdowns, Report, ReportMetadata};
use anyhow::Result;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Generate the plain text console report.
pub fn generate_text_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("\n=== Insurance Quote Analysis Report ===\n");
    output.push_str(&format!(
        "\nAnalysis Date: {} UTC\n",
        report.metadata.analysis_date.format(DATE_FORMAT)
    ));
    output.push_str(&format!(
        "Total Records Analyzed: {}\n",
        report.metadata.total_records
    ));

    output.push_str("\nCarrier Quote Patterns:\n");
    if report.carrier_patterns.is_empty() {
        output.push_str("\n  No known carrier columns found.\n");
    }
    for stat in report.carrier_patterns.iter() {
        output.push_str(&format!("\n{}:\n", stat.carrier));
        output.push_str(&format!("  Total Quotes: {}\n", stat.quote_count));
        output.push_str(&format!("  Quote Rate: {:.2}%\n", stat.quote_percentage));
    }

    output.push_str("\nLine of Business Analysis:\n");
    for lob in report.lob_analysis.iter() {
        output.push_str(&format!("\n{}:\n", lob.lob));
        output.push_str(&format!("  Total Submissions: {}\n", lob.total_submissions));
        if !lob.carrier_responses.is_empty() {
            output.push_str("  Carrier Responses:\n");
            for response in &lob.carrier_responses {
                output.push_str(&format!(
                    "    {}: {} quotes\n",
                    response.carrier, response.quote_count
                ));
            }
        }
    }

    output
}

/// Generate a Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Insurance Quote Analysis Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_carrier_section(&report.carrier_patterns));
    output.push_str(&generate_lob_section(&report.lob_analysis));

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Analysis Date:** {} UTC\n",
        metadata.analysis_date.format(DATE_FORMAT)
    ));
    section.push_str(&format!(
        "- **Total Records Analyzed:** {}\n\n",
        metadata.total_records
    ));

    section
}

fn generate_carrier_section(stats: &CarrierStatistics) -> String {
    let mut section = String::new();

    section.push_str("## Carrier Quote Patterns\n\n");
    if stats.is_empty() {
        section.push_str("No known carrier columns found.\n\n");
        return section;
    }

    section.push_str("| Carrier | Quotes | Quote Rate | Submissions |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");
    for stat in stats.iter() {
        section.push_str(&format!(
            "| {} | {} | {:.2}% | {} |\n",
            stat.carrier, stat.quote_count, stat.quote_percentage, stat.total_submissions
        ));
    }
    section.push('\n');

    section
}

fn generate_lob_section(lobs: &LobBreakdowns) -> String {
    let mut section = String::new();

    section.push_str("## Line of Business Analysis\n\n");

    for lob in lobs.iter() {
        section.push_str(&format!("### {}\n\n", lob.lob));
        section.push_str(&format!(
            "*Total Submissions: {}*\n\n",
            lob.total_submissions
        ));

        if lob.carrier_responses.is_empty() {
            section.push_str("No carrier quotes.\n\n");
            continue;
        }

        section.push_str("| Carrier | Quotes |\n");
        section.push_str("|:---|:---:|\n");
        for response in &lob.carrier_responses {
            section.push_str(&format!(
                "| {} | {} |\n",
                response.carrier, response.quote_count
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CarrierResponse, CarrierStatistic, LobBreakdown, LobKey,
    };
    use chrono::{TimeZone, Utc};

    fn create_test_report() -> Report {
        Report {
            metadata: ReportMetadata {
                analysis_date: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap(),
                total_records: 4,
            },
            carrier_patterns: CarrierStatistics::new(vec![
                CarrierStatistic {
                    carrier: "Chubb".to_string(),
                    quote_count: 2,
                    quote_percentage: 50.0,
                    total_submissions: 4,
                },
                CarrierStatistic {
                    carrier: "Liberty Mutual".to_string(),
                    quote_count: 1,
                    quote_percentage: 33.33,
                    total_submissions: 4,
                },
            ]),
            lob_analysis: LobBreakdowns::new(vec![
                LobBreakdown {
                    lob: LobKey::from("GL"),
                    total_submissions: 3,
                    carrier_responses: vec![CarrierResponse {
                        carrier: "Chubb".to_string(),
                        quote_count: 2,
                    }],
                },
                LobBreakdown {
                    lob: LobKey::Unknown,
                    total_submissions: 1,
                    carrier_responses: Vec::new(),
                },
            ]),
        }
    }

    #[test]
    fn test_generate_text_report() {
        let text = generate_text_report(&create_test_report());

        assert!(text.contains("=== Insurance Quote Analysis Report ==="));
        assert!(text.contains("Analysis Date: 2024-03-01 09:30:05 UTC\n"));
        assert!(text.contains("Total Records Analyzed: 4"));
        assert!(text.contains("Chubb:\n  Total Quotes: 2\n  Quote Rate: 50.00%"));
        assert!(text.contains("Quote Rate: 33.33%"));
        assert!(text.contains("GL:\n  Total Submissions: 3\n  Carrier Responses:\n    Chubb: 2 quotes"));
        assert!(text.contains("(unknown LOB):\n  Total Submissions: 1\n"));
    }

    #[test]
    fn test_text_report_keeps_carrier_order() {
        let text = generate_text_report(&create_test_report());
        let chubb = text.find("Chubb:").unwrap();
        let liberty = text.find("Liberty Mutual:").unwrap();
        assert!(chubb < liberty);
    }

    #[test]
    fn test_text_report_without_carriers() {
        let mut report = create_test_report();
        report.carrier_patterns = CarrierStatistics::default();

        let text = generate_text_report(&report);
        assert!(text.contains("No known carrier columns found."));
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report());

        assert!(markdown.contains("# Insurance Quote Analysis Report"));
        assert!(markdown.contains("- **Analysis Date:** 2024-03-01 09:30:05 UTC"));
        assert!(markdown.contains("| Chubb | 2 | 50.00% | 4 |"));
        assert!(markdown.contains("### GL"));
        assert!(markdown.contains("### (unknown LOB)"));
        assert!(markdown.contains("No carrier quotes."));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["total_records"], 4);
        assert_eq!(value["carrier_patterns"][0]["carrier"], "Chubb");
        assert_eq!(value["carrier_patterns"][0]["quote_percentage"], 50.0);
        assert_eq!(value["lob_analysis"][0]["lob"], "GL");
        assert!(value["lob_analysis"][1]["lob"].is_null());
        assert_eq!(
            value["lob_analysis"][0]["carrier_responses"][0]["quote_count"],
            2
        );
    }
}
