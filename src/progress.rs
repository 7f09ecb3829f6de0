use console::Term;

/// Receives one tick per finished status lookup. Purely observational.
pub trait Progress: Send + Sync {
    fn start(&self) {}

    fn tick(&self);

    fn finish(&self) {}
}

pub struct NoProgress;

impl Progress for NoProgress {
    fn tick(&self) {}
}

/// Prints a dot per lookup on one line, closed with ` Done`.
pub struct DotProgress {
    term: Term,
}

impl DotProgress {
    pub fn new(term: Term) -> Self {
        Self { term }
    }
}

// Write failures are ignored: a broken progress line must not fail the run.
impl Progress for DotProgress {
    fn start(&self) {
        let _ = self.term.write_str("... fetching deployment statuses ");
    }

    fn tick(&self) {
        let _ = self.term.write_str(".");
    }

    fn finish(&self) {
        let _ = self.term.write_line(" Done");
    }
}
