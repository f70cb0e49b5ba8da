use power_align::{Alignment, AlignmentOutput, ErrorCounts};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Report<'a> {
    cases: Vec<CaseReport<'a>>,
}

#[derive(Debug, Serialize)]
struct CaseReport<'a> {
    id: &'a str,
    wer: AlignmentReport,
    power: AlignmentReport,
    lookup_misses: &'a [String],
}

#[derive(Debug, Serialize)]
struct AlignmentReport {
    s1: Vec<String>,
    s2: Vec<String>,
    align: String,
    counts: ErrorCounts,
    error_rate: Option<f64>,
}

impl AlignmentReport {
    fn from_alignment(alignment: &Alignment) -> Self {
        let counts = alignment.error_counts();
        Self {
            s1: alignment.s1(),
            s2: alignment.s2(),
            align: alignment.align().iter().map(|op| op.as_char()).collect(),
            counts,
            error_rate: counts.error_rate(),
        }
    }
}

pub fn render(results: &[(String, AlignmentOutput)]) -> Result<String, String> {
    let report = Report {
        cases: results
            .iter()
            .map(|(id, output)| CaseReport {
                id,
                wer: AlignmentReport::from_alignment(&output.wer_alignment),
                power: AlignmentReport::from_alignment(&output.power_alignment),
                lookup_misses: &output.lookup_misses,
            })
            .collect(),
    };
    let mut rendered = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("Failed to serialize report JSON: {err}"))?;
    rendered.push('\n');
    Ok(rendered)
}
