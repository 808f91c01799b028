//! Test fixtures: fake classifiers, a recording notifier and a temp input folder.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use image::RgbImage;
use tempfile::TempDir;

use modgate_pipeline::{
    Blacklist, Captioner, ClassifierAdapter, ClassifierError, DecisionPipeline, LabelScore,
    NsfwModel, WordListMatcher,
};

use crate::datastore::{DatastoreError, StatusNotifier};
use crate::queue::TaskQueue;
use crate::state::AppState;
use crate::worker::Worker;

pub(crate) struct CountingCaptioner {
    caption: String,
    pub calls: AtomicUsize,
    panics: AtomicUsize,
}

impl CountingCaptioner {
    /// Make the next call panic instead of returning a caption.
    pub fn panic_on_next_call(&self) {
        self.panics.store(1, Ordering::SeqCst);
    }
}

impl Captioner for CountingCaptioner {
    fn caption(&self, _image: &RgbImage) -> Result<String, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panics.swap(0, Ordering::SeqCst) > 0 {
            panic!("captioner crashed");
        }
        Ok(self.caption.clone())
    }
}

pub(crate) struct CountingNsfw {
    score: f64,
    pub calls: AtomicUsize,
}

impl NsfwModel for CountingNsfw {
    fn predict(&self, _image: &RgbImage) -> Result<Vec<LabelScore>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            LabelScore::new("normal", 1.0 - self.score),
            LabelScore::new("nsfw", self.score),
        ])
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    updates: Mutex<Vec<(String, bool)>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn updates(&self) -> Vec<(String, bool)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatusNotifier for RecordingNotifier {
    async fn update_moderation_status(
        &self,
        filename: &str,
        is_adult: bool,
    ) -> Result<(), DatastoreError> {
        self.updates
            .lock()
            .unwrap()
            .push((filename.to_string(), is_adult));
        if self.fail {
            return Err(DatastoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

pub(crate) struct Fixture {
    pub input_dir: TempDir,
    pub state: Arc<AppState>,
    pub captioner: Arc<CountingCaptioner>,
    pub nsfw: Arc<CountingNsfw>,
    pub notifier: Arc<RecordingNotifier>,
    pipeline: Arc<DecisionPipeline>,
}

impl Fixture {
    pub fn new(caption: &str, nsfw_score: f64) -> Self {
        Self::with_queue(caption, nsfw_score, TaskQueue::new(16))
    }

    pub fn with_queue(caption: &str, nsfw_score: f64, queue: TaskQueue) -> Self {
        let input_dir = tempfile::tempdir().unwrap();
        let state = AppState::new(input_dir.path(), queue, 2);

        let captioner = Arc::new(CountingCaptioner {
            caption: caption.to_string(),
            calls: AtomicUsize::new(0),
            panics: AtomicUsize::new(0),
        });
        let nsfw = Arc::new(CountingNsfw {
            score: nsfw_score,
            calls: AtomicUsize::new(0),
        });
        let adapter = ClassifierAdapter::new(
            captioner.clone(),
            nsfw.clone(),
            Arc::new(WordListMatcher::builtin()),
        );
        let pipeline = Arc::new(DecisionPipeline::new(adapter, Blacklist::default()));

        Self {
            input_dir,
            state,
            captioner,
            nsfw,
            notifier: Arc::new(RecordingNotifier::default()),
            pipeline,
        }
    }

    pub fn with_failing_notifier(mut self) -> Self {
        self.notifier = Arc::new(RecordingNotifier {
            updates: Mutex::new(Vec::new()),
            fail: true,
        });
        self
    }

    pub fn worker(&self) -> Worker {
        Worker::new(
            self.state.clone(),
            self.pipeline.clone(),
            self.notifier.clone(),
        )
    }

    pub fn write_image(&self, name: &str) {
        RgbImage::from_pixel(8, 8, image::Rgb([30, 90, 160]))
            .save(self.input_dir.path().join(name))
            .unwrap();
    }
}

/// Poll until the store holds `count` records, panicking after `timeout`.
pub(crate) async fn wait_for_records(state: &AppState, count: usize, timeout: Duration) {
    tokio::time::timeout(timeout, async {
        while state.results.len().await < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("tasks did not finish in time");
}
