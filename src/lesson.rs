//==============================================================================
// The memset lesson: initializing arrays and sizing byte fills correctly
//==============================================================================
//
// Each step performs only the correct operation and records what it saw.
// The undersized fills the lesson warns about are described through
// `Coverage`, never executed.

use colored::Colorize;
use log::debug;

use crate::buffer::HeapBuffer;
use crate::config::LessonConfig;
use crate::error::{FillError, LessonError};
use crate::size::{ByteLen, Coverage, ElementCount, ElementSize};
use crate::zero_fill::{fill_bytes, fill_elements};

/// Element type used throughout the lesson.
pub type Element = i32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub title: &'static str,
    pub detail: String,
    pub passed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LessonReport {
    steps: Vec<Step>,
}

impl LessonReport {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn passed(&self) -> bool {
        self.steps.iter().all(|step| step.passed)
    }

    pub fn render(&self, use_color: bool) -> String {
        let mut out = String::new();
        for (i, step) in self.steps.iter().enumerate() {
            let mark = match (step.passed, use_color) {
                (true, true) => "✓".green().to_string(),
                (false, true) => "✗".red().to_string(),
                (true, false) => "ok".to_string(),
                (false, false) => "FAIL".to_string(),
            };
            let title = if use_color {
                step.title.bold().to_string()
            } else {
                step.title.to_string()
            };
            out.push_str(&format!("{} {}. {}\n    {}\n", mark, i + 1, title, step.detail));
        }
        out
    }

    fn record(&mut self, title: &'static str, detail: String, passed: bool) {
        debug!("[lesson] {title}: {detail}");
        self.steps.push(Step { title, detail, passed });
    }
}

pub struct Lesson {
    config: LessonConfig,
}

impl Lesson {
    pub fn new(config: LessonConfig) -> Result<Self, LessonError> {
        config.validate()?;
        Ok(Lesson { config })
    }

    pub fn run(&self) -> Result<LessonReport, LessonError> {
        let mut report = LessonReport::default();
        self.default_initialized_array(&mut report);
        self.filled_scoped_array(&mut report)?;
        self.byte_length(&mut report)?;
        self.checked_raw_fill(&mut report)?;
        self.heap_buffer(&mut report)?;
        self.single_value_pitfall(&mut report)?;
        self.element_count_coverage(&mut report)?;
        Ok(report)
    }

    fn count(&self) -> ElementCount {
        self.config.element_count()
    }

    fn pattern(byte: u8) -> Element {
        Element::from_ne_bytes([byte; std::mem::size_of::<Element>()])
    }

    // Step 1: default initialization leaves nothing to fill.
    fn default_initialized_array(&self, report: &mut LessonReport) {
        let ai = vec![Element::default(); self.count().get()];
        let zeros = ai.iter().filter(|&&v| v == 0).count();
        report.record(
            "Default-initialized array",
            format!("{} of {} elements start at zero", zeros, ai.len()),
            zeros == ai.len(),
        );
    }

    // Step 2: a scoped array holding leftovers, filled element-wise.
    fn filled_scoped_array(&self, report: &mut LessonReport) -> Result<(), LessonError> {
        let mut ai = vec![Self::pattern(self.config.sentinel); self.count().get()];
        let written = fill_elements(&mut ai, self.config.fill);

        let expected = Self::pattern(self.config.fill);
        let remaining = ai.iter().filter(|&&v| v != expected).count();
        if remaining > 0 {
            return Err(LessonError::Mismatch {
                step: "scoped array",
                remaining,
            });
        }

        report.record(
            "Scoped array filled by element",
            format!("{written} written over {} elements holding {:#04x}", ai.len(), self.config.sentinel),
            true,
        );
        Ok(())
    }

    // Step 3: the byte length comes from a size query, not from a constant,
    // and matches what a real array of that many elements occupies.
    fn byte_length(&self, report: &mut LessonReport) -> Result<(), LessonError> {
        let size = ElementSize::of::<Element>()?;
        let len = self.count().bytes(size)?;
        let ai = vec![Element::default(); self.count().get()];
        let occupied = ByteLen::of_slice(&ai);
        report.record(
            "Byte length from a size query",
            format!("{} x {} = {}", self.count(), size, len),
            len == occupied,
        );
        Ok(())
    }

    // Step 4: the raw fill rejects a region that is too short instead of
    // writing past its end.
    fn checked_raw_fill(&self, report: &mut LessonReport) -> Result<(), LessonError> {
        let mut region = vec![Self::pattern(self.config.sentinel); self.count().get()];

        let len = fill_bytes(Some(&mut region[..]), self.count(), self.config.fill)?;
        let expected = Self::pattern(self.config.fill);
        let remaining = region.iter().filter(|&&v| v != expected).count();
        if remaining > 0 {
            return Err(LessonError::Mismatch {
                step: "raw region",
                remaining,
            });
        }

        let one_more = ElementCount::new(self.count().get() + 1);
        let rejected = match fill_bytes(Some(&mut region[..]), one_more, self.config.sentinel) {
            Err(FillError::InvalidLength { requested, capacity }) => {
                debug!("[lesson] over-long fill of {requested} rejected, capacity {capacity}");
                true
            }
            Err(err) => return Err(err.into()),
            Ok(_) => false,
        };

        report.record(
            "Checked raw fill",
            format!("{len} filled; {one_more} rejected before writing"),
            rejected,
        );
        Ok(())
    }

    // Step 5: heap storage allocated once and released once when dropped.
    fn heap_buffer(&self, report: &mut LessonReport) -> Result<(), LessonError> {
        let mut buffer = HeapBuffer::<Element>::filled(self.count(), self.config.sentinel)?;
        let written = buffer.fill(self.config.fill);

        let expected = Self::pattern(self.config.fill);
        let remaining = buffer.iter().filter(|&&v| v != expected).count();
        if remaining > 0 {
            return Err(LessonError::Mismatch {
                step: "heap buffer",
                remaining,
            });
        }

        report.record(
            "Heap buffer",
            format!("{} allocated, {written} filled, released on drop", buffer.count()),
            true,
        );
        Ok(())
    }

    // Step 6: one boxed value versus an array of that many elements.
    fn single_value_pitfall(&self, report: &mut LessonReport) -> Result<(), LessonError> {
        let elements = self.count().get();
        let one = Box::new(Element::try_from(elements).unwrap_or(Element::MAX));
        let many = HeapBuffer::<Element>::zeroed(self.count())?;

        report.record(
            "One value is not an array",
            format!(
                "Box::new({}) holds 1 element ({}), the array holds {} ({})",
                one,
                ByteLen::of_slice(std::slice::from_ref(&*one)),
                many.len(),
                many.byte_len(),
            ),
            many.len() == elements,
        );
        Ok(())
    }

    // Step 7: what filling only `count` bytes would have reached.
    fn element_count_coverage(&self, report: &mut LessonReport) -> Result<(), LessonError> {
        let size = ElementSize::of::<Element>()?;
        let elements = self.count().get();
        let coverage = Coverage::of(elements, size);
        let stale = elements - coverage.whole_elements.min(elements);

        report.record(
            "Element count is not a byte count",
            format!(
                "{} bytes cover {} whole elements and {} bytes of the next; {} running totals would start from leftovers",
                elements, coverage.whole_elements, coverage.partial_bytes, stale,
            ),
            true,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_default() -> LessonReport {
        Lesson::new(LessonConfig::default()).unwrap().run().unwrap()
    }

    #[test]
    fn test_default_lesson_passes() {
        let report = run_default();
        assert_eq!(report.steps().len(), 7);
        assert!(report.passed());
    }

    #[test]
    fn test_byte_length_step_reports_forty_bytes() {
        let report = run_default();
        let step = &report.steps()[2];
        assert_eq!(step.detail, "10 elements x 4 bytes/element = 40 bytes");
    }

    #[test]
    fn test_coverage_step_counts_stale_totals() {
        let report = run_default();
        let step = report.steps().last().unwrap();
        assert!(step.detail.contains("cover 2 whole elements and 2 bytes"));
        assert!(step.detail.contains("8 running totals"));
    }

    #[test]
    fn test_single_value_step() {
        let report = run_default();
        let step = &report.steps()[5];
        assert!(step.detail.starts_with("Box::new(10) holds 1 element (4 bytes)"));
        assert!(step.detail.contains("the array holds 10 (40 bytes)"));
    }

    #[test]
    fn test_custom_fill_byte() {
        let config = LessonConfig {
            elements: 3,
            sentinel: 0x00,
            fill: 0x7F,
            narrate: false,
        };
        let report = Lesson::new(config).unwrap().run().unwrap();
        assert!(report.passed());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LessonConfig {
            elements: 0,
            ..LessonConfig::default()
        };
        assert!(matches!(Lesson::new(config), Err(LessonError::Config(_))));
    }

    #[test]
    fn test_expected_rejection_logs_below_warn() {
        let mark = capture::start();
        run_default();
        let records = capture::records_since(mark);

        assert!(records.iter().all(|(level, _)| *level > log::Level::Warn), "{records:?}");
        assert!(records.contains(&(
            log::Level::Debug,
            "[zero_fill] rejected: 44 bytes requested, capacity 40 bytes".to_string(),
        )));
    }

    #[test]
    fn test_render_colored() {
        colored::control::set_override(true);
        let rendered = run_default().render(true);
        colored::control::unset_override();

        assert!(rendered.starts_with("\u{1b}[32m✓\u{1b}[0m 1. \u{1b}[1mDefault-initialized array\u{1b}[0m\n"));
        assert!(!rendered.contains('✗'));
    }

    #[test]
    fn test_render_plain() {
        let rendered = run_default().render(false);
        assert!(rendered.starts_with("ok 1. Default-initialized array\n"));
        assert_eq!(rendered.lines().count(), 14);
        assert!(!rendered.contains("FAIL"));
    }

    #[test]
    fn test_render_failed_step() {
        let mut report = LessonReport::default();
        report.record("Broken", "nothing".to_string(), false);
        assert!(!report.passed());
        assert_eq!(report.render(false), "FAIL 1. Broken\n    nothing\n");
    }

    /// Collects log records per thread so tests running in parallel do not
    /// see each other's output.
    mod capture {
        use log::{Level, LevelFilter, Log, Metadata, Record};
        use std::sync::{Mutex, Once};
        use std::thread::{self, ThreadId};

        static RECORDS: Mutex<Vec<(ThreadId, Level, String)>> = Mutex::new(Vec::new());
        static LOGGER: CaptureLogger = CaptureLogger;
        static INIT: Once = Once::new();

        struct CaptureLogger;

        impl Log for CaptureLogger {
            fn enabled(&self, _: &Metadata) -> bool {
                true
            }

            fn log(&self, record: &Record) {
                let entry = (thread::current().id(), record.level(), record.args().to_string());
                RECORDS.lock().unwrap().push(entry);
            }

            fn flush(&self) {}
        }

        pub fn start() -> usize {
            INIT.call_once(|| {
                log::set_logger(&LOGGER).unwrap();
                log::set_max_level(LevelFilter::Trace);
            });
            RECORDS.lock().unwrap().len()
        }

        pub fn records_since(mark: usize) -> Vec<(Level, String)> {
            let me = thread::current().id();
            RECORDS.lock().unwrap()[mark..]
                .iter()
                .filter(|(id, _, _)| *id == me)
                .map(|(_, level, message)| (*level, message.clone()))
                .collect()
        }
    }
}
