/// Events emitted while a pipeline runs.
#[derive(Debug, Clone)]
pub enum Progress {
    StageStart { name: &'static str },
    StageFinish,

    /// A per-molecule stage is about to visit `total` molecules.
    MoleculesStart { total: u64 },
    MoleculeProcessed,
    MoleculesFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::Message("ignored".to_string()));
    }

    #[test]
    fn callback_receives_events_in_order() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            let label = match event {
                Progress::StageStart { name } => name.to_string(),
                Progress::StageFinish => "finish".to_string(),
                _ => "other".to_string(),
            };
            events.lock().unwrap().push(label);
        }));

        reporter.report(Progress::StageStart { name: "make-bonds" });
        reporter.report(Progress::MoleculeProcessed);
        reporter.report(Progress::StageFinish);
        drop(reporter);

        assert_eq!(events.into_inner().unwrap(), vec!["make-bonds", "other", "finish"]);
    }
}
