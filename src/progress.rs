// src/progress.rs
/// Lightweight progress reporting used by passes that walk the record source.
/// Frontends implement this to surface status to the operator.
pub trait Progress {
    /// Called at the start with the number of records to look at.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called once per record examined; `nations` is empty when nothing matched.
    fn item_done(&mut self, _photo_id: &str, _nations: &[String]) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Collects everything it is told. Handy in tests and for batch summaries.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub total: Option<usize>,
    pub lines: Vec<String>,
    pub items: Vec<(String, Vec<String>)>,
    pub finished: bool,
}

impl Progress for RecordingProgress {
    fn begin(&mut self, total: usize) { self.total = Some(total); }
    fn log(&mut self, msg: &str) { self.lines.push(s!(msg)); }
    fn item_done(&mut self, photo_id: &str, nations: &[String]) {
        self.items.push((s!(photo_id), nations.to_vec()));
    }
    fn finish(&mut self) { self.finished = true; }
}
