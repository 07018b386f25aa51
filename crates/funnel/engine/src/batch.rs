//! Batch execution over independent trajectories.

use funnel_types::{ArrivalVariant, Descriptor, IntentFrame, Trajectory, TrajectoryOutcome};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::flow::Flow;
use crate::runner::TrajectoryRunner;

/// One (descriptor, variant) pair to simulate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryJob {
    pub descriptor: Descriptor,
    pub variant: ArrivalVariant,
    #[serde(default)]
    pub intent: Option<IntentFrame>,
}

impl TrajectoryJob {
    pub fn new(descriptor: Descriptor, variant: ArrivalVariant) -> Self {
        Self {
            descriptor,
            variant,
            intent: None,
        }
    }

    pub fn with_intent(mut self, intent: IntentFrame) -> Self {
        self.intent = Some(intent);
        self
    }

    /// Every descriptor in every variant, descriptor-major.
    pub fn cross(descriptors: &[Descriptor], variants: &[ArrivalVariant]) -> Vec<Self> {
        descriptors
            .iter()
            .flat_map(|d| variants.iter().map(move |v| Self::new(d.clone(), *v)))
            .collect()
    }
}

/// Outcome counts for a batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub dropped: usize,
    pub errored: usize,
    /// Drop count keyed by stage index.
    pub drops_by_stage: BTreeMap<usize, usize>,
}

impl BatchSummary {
    pub fn from_trajectories(trajectories: &[Trajectory]) -> Self {
        let mut summary = Self {
            total: trajectories.len(),
            ..Self::default()
        };
        for t in trajectories {
            match &t.outcome {
                TrajectoryOutcome::Completed => summary.completed += 1,
                TrajectoryOutcome::Dropped { stage_index, .. } => {
                    summary.dropped += 1;
                    *summary.drops_by_stage.entry(*stage_index).or_default() += 1;
                }
                TrajectoryOutcome::Errored { .. } => summary.errored += 1,
            }
        }
        summary
    }

    /// Fraction of trajectories that completed the flow.
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// One trajectory per job, in job order.
    pub trajectories: Vec<Trajectory>,
    pub summary: BatchSummary,
}

/// Runs many trajectories on a fixed-size worker pool.
///
/// Output is identical for any worker count: trajectories share no state and
/// all randomness is keyed per stage.
pub struct BatchRunner {
    runner: TrajectoryRunner,
    pool: Option<rayon::ThreadPool>,
}

impl BatchRunner {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let runner = TrajectoryRunner::new(config);
        let workers = usize::try_from(runner.config().batch.worker_threads)
            .unwrap_or(1)
            .max(1);
        let pool = if workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| EngineError::WorkerPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };
        Ok(Self { runner, pool })
    }

    pub fn runner(&self) -> &TrajectoryRunner {
        &self.runner
    }

    pub fn run(&self, flow: &Flow, jobs: &[TrajectoryJob]) -> BatchReport {
        let trajectories = match &self.pool {
            Some(pool) if jobs.len() > 1 => pool.install(|| {
                jobs.par_iter()
                    .map(|job| self.run_isolated(flow, job))
                    .collect::<Vec<_>>()
            }),
            _ => jobs
                .iter()
                .map(|job| self.run_isolated(flow, job))
                .collect::<Vec<_>>(),
        };

        let summary = BatchSummary::from_trajectories(&trajectories);
        info!(
            total = summary.total,
            completed = summary.completed,
            dropped = summary.dropped,
            errored = summary.errored,
            policy = %self.runner.config().policy,
            "Batch finished"
        );
        BatchReport {
            trajectories,
            summary,
        }
    }

    /// A panic inside one trajectory becomes an errored trajectory instead of
    /// tearing down the batch.
    fn run_isolated(&self, flow: &Flow, job: &TrajectoryJob) -> Trajectory {
        let result = catch_unwind(AssertUnwindSafe(|| {
            self.runner
                .run(&job.descriptor, job.variant, flow, job.intent.as_ref())
        }));
        result.unwrap_or_else(|_| {
            warn!(
                individual_id = job.descriptor.id.as_str(),
                variant = job.variant.id(),
                "Trajectory panicked"
            );
            Trajectory::errored(
                job.descriptor.id.clone(),
                job.variant,
                self.runner.config().policy,
                Vec::new(),
                "trajectory panicked",
            )
        })
    }
}
