use bevy::prelude::*;

/// Outcome of the two initial loads. A load is settled once it has either
/// succeeded or failed; the scene runs with whatever arrived.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadingProgress {
    pub background_ready: bool,
    pub background_settled: bool,
    pub model_ready: bool,
    pub model_settled: bool,
}

impl LoadingProgress {
    pub fn settle_background(&mut self, ready: bool) {
        self.background_ready = ready;
        self.background_settled = true;
    }

    pub fn settle_model(&mut self, ready: bool) {
        self.model_ready = ready;
        self.model_settled = true;
    }

    pub fn is_settled(&self) -> bool {
        self.background_settled && self.model_settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_still_settle() {
        let mut progress = LoadingProgress::default();
        assert!(!progress.is_settled());

        progress.settle_background(false);
        assert!(!progress.is_settled());

        progress.settle_model(true);
        assert!(progress.is_settled());
        assert!(!progress.background_ready);
        assert!(progress.model_ready);
    }
}
