//! Report rendering

use comfy_table::{Table, presets::UTF8_FULL};
use probe_core::{ProbeReport, Result, RunReport};
use std::io::Write;

const RULE_WIDTH: usize = 60;

/// Title of the closing banner
pub const SUMMARY_TITLE: &str = "Health check complete";

/// Turns probe reports into output
pub trait Renderer {
    /// Called once before the first probe runs, with the probe titles in run order
    fn render_header(&mut self, titles: &[&str]) -> Result<()>;

    /// Called as soon as a probe finishes; `index` is its zero-based position
    fn render_probe(&mut self, index: usize, report: &ProbeReport) -> Result<()>;

    /// Called once after every probe has run
    fn render_summary(&mut self, run: &RunReport) -> Result<()>;
}

/// Plain-text renderer with emoji status markers
pub struct ConsoleRenderer<W: Write> {
    out: W,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn banner(&mut self, title: &str) -> Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.out)?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "{rule}")?;
        Ok(())
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render_header(&mut self, titles: &[&str]) -> Result<()> {
        writeln!(self.out, "🔍 Stock analysis data-source health check")?;
        writeln!(self.out, "   {} probes: {}", titles.len(), titles.join(", "))?;
        self.out.flush()?;
        Ok(())
    }

    fn render_probe(&mut self, index: usize, report: &ProbeReport) -> Result<()> {
        self.banner(&format!("{}. Testing {}", index + 1, report.title))?;

        let mut current_target: Option<&str> = None;
        for check in &report.checks {
            let target = check.target.as_deref();
            if target.is_some() && target != current_target {
                writeln!(self.out, "\n📊 {}", target.unwrap_or_default())?;
                current_target = target;
            }

            writeln!(
                self.out,
                "  {} {}: {}",
                check.status.marker(),
                check.check,
                check.detail
            )?;

            if let Some(hint) = &check.hint {
                writeln!(self.out, "     💡 {hint}")?;
            }
        }

        writeln!(
            self.out,
            "\n  ({} checks in {:.1}s)",
            report.checks.len(),
            report.elapsed.as_secs_f64()
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn render_summary(&mut self, run: &RunReport) -> Result<()> {
        self.banner(SUMMARY_TITLE)?;

        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![
            "Probe",
            "✅ Success",
            "⚠️ Warning",
            "❌ Failure",
        ]);

        for probe in &run.probes {
            let totals = probe.totals();
            table.add_row(vec![
                probe.title.clone(),
                totals.success.to_string(),
                totals.warning.to_string(),
                totals.failure.to_string(),
            ]);
        }

        let totals = run.totals();
        table.add_row(vec![
            "Total".to_string(),
            totals.success.to_string(),
            totals.warning.to_string(),
            totals.failure.to_string(),
        ]);

        writeln!(self.out, "{table}")?;

        let elapsed = (run.finished_at - run.started_at).num_milliseconds() as f64 / 1000.0;
        writeln!(self.out, "Run {} finished in {elapsed:.1}s", run.run_id)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Renderer that prints the whole run as one JSON document
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render_header(&mut self, _titles: &[&str]) -> Result<()> {
        Ok(())
    }

    fn render_probe(&mut self, _index: usize, _report: &ProbeReport) -> Result<()> {
        Ok(())
    }

    fn render_summary(&mut self, run: &RunReport) -> Result<()> {
        writeln!(self.out, "{}", run.to_json_pretty()?)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_core::CheckOutcome;

    fn run_with_two_probes() -> RunReport {
        let mut run = RunReport::start();
        run.push(
            ProbeReport::builder("market_data", "Market Data (Yahoo Finance)")
                .push(CheckOutcome::success("profile", "Infosys Limited").for_target("INFY.NS"))
                .push(CheckOutcome::failure("history", "timed out").for_target("INFY.NS"))
                .finish(),
        );
        run.push(
            ProbeReport::builder("indicators", "Technical Indicators (ta)")
                .push(CheckOutcome::dependency_missing(
                    "library",
                    "not compiled in",
                    "cargo build -p probe-stock --features indicators",
                ))
                .finish(),
        );
        run.finish()
    }

    fn render_text(run: &RunReport) -> String {
        let mut renderer = ConsoleRenderer::new(Vec::new());
        let titles: Vec<&str> = run.probes.iter().map(|p| p.title.as_str()).collect();
        renderer.render_header(&titles).unwrap();
        for (index, probe) in run.probes.iter().enumerate() {
            renderer.render_probe(index, probe).unwrap();
        }
        renderer.render_summary(run).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_console_sections_in_order() {
        let text = render_text(&run_with_two_probes());

        let first = text.find("1. Testing Market Data (Yahoo Finance)").unwrap();
        let second = text.find("2. Testing Technical Indicators (ta)").unwrap();
        let summary = text.find(SUMMARY_TITLE).unwrap();
        assert!(first < second && second < summary);
        assert_eq!(text.matches(SUMMARY_TITLE).count(), 1);
    }

    #[test]
    fn test_console_markers_targets_and_hints() {
        let text = render_text(&run_with_two_probes());

        assert!(text.contains("📊 INFY.NS"));
        assert!(text.contains("✅ profile: Infosys Limited"));
        assert!(text.contains("❌ history: timed out"));
        assert!(text.contains("💡 cargo build -p probe-stock --features indicators"));
        assert!(text.contains("Total"));
    }

    #[test]
    fn test_console_header_precedes_sections() {
        let text = render_text(&run_with_two_probes());

        assert!(text.starts_with("🔍 "));
        assert!(text.contains("2 probes: Market Data (Yahoo Finance), Technical Indicators (ta)"));
        assert!(text.find("2 probes").unwrap() < text.find("1. Testing").unwrap());
    }

    #[test]
    fn test_json_renderer_emits_run() {
        let run = run_with_two_probes();
        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.render_header(&["Market Data (Yahoo Finance)"]).unwrap();
        renderer.render_probe(0, &run.probes[0]).unwrap();
        renderer.render_summary(&run).unwrap();

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["probes"].as_array().unwrap().len(), 2);
        assert_eq!(value["probes"][1]["checks"][0]["reason"], "dependency_missing");
    }
}
