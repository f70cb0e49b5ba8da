use std::fmt::Write;

use power_align::{Alignment, AlignmentOutput};

pub fn render(results: &[(String, AlignmentOutput)]) -> String {
    let mut out = String::new();
    for (id, output) in results {
        let _ = writeln!(out, "== {id}");
        write_section(&mut out, "WER", &output.wer_alignment);
        write_section(&mut out, "POWER", &output.power_alignment);
        if !output.lookup_misses.is_empty() {
            let _ = writeln!(out, "unknown words: {}", output.lookup_misses.join(", "));
        }
        out.push('\n');
    }
    out
}

fn write_section(out: &mut String, label: &str, alignment: &Alignment) {
    let counts = alignment.error_counts();
    let rate = counts
        .error_rate()
        .map(|r| format!("{:.2}%", r * 100.0))
        .unwrap_or_else(|| "n/a".to_string());
    let _ = writeln!(
        out,
        "{label} {rate} (S={} I={} D={} C={})",
        counts.substitutions, counts.insertions, counts.deletions, counts.correct
    );
    let _ = writeln!(out, "{alignment}");
}
