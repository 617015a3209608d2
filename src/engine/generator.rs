use super::builder::{GrowthStrategy, TreeBuilder};
use super::population::{FillState, Population, Species};
use super::tree::Program;
use crate::config::{ConfigSection, GenerationConfig};
use crate::error::{Result, TreegenError};
use crate::opcodes::{LiteralBounds, OpcodeRegistry};
use crate::random::RandomFactory;
use crate::scoring::Scorer;
use rand::Rng;
use rayon::prelude::*;
use std::sync::{Arc, Mutex};

/// Randomized program generator: builds type-valid candidate trees, scores
/// them, deduplicates by canonical text, and fills whole populations.
pub struct TreeGenerator {
    config: GenerationConfig,
    builder: TreeBuilder,
    scorer: Arc<dyn Scorer>,
    random_factory: Arc<dyn RandomFactory>,
}

impl TreeGenerator {
    pub fn new(
        config: GenerationConfig,
        registry: Arc<OpcodeRegistry>,
        strategy: GrowthStrategy,
        scorer: Arc<dyn Scorer>,
        random_factory: Arc<dyn RandomFactory>,
    ) -> Result<Self> {
        config.validate()?;
        if registry.is_empty() {
            return Err(TreegenError::Configuration(
                "no opcodes registered".to_string(),
            ));
        }
        let bounds = LiteralBounds {
            min: config.min_const,
            max: config.max_const,
        };
        let builder = TreeBuilder::new(registry, strategy, config.max_depth, bounds);
        Ok(Self {
            config,
            builder,
            scorer,
            random_factory,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Produce one accepted program against a private dedup set
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Program> {
        let shared = Mutex::new(FillState::default());
        self.attempt_create_genome(rng, &shared)
    }

    /// Fill `population`'s default species with accepted programs.
    ///
    /// Runs sequentially when the scorer demands it or the configured
    /// thread count is 1; otherwise one rayon task per slot, with
    /// insertion serialized under a single lock. A failed slot aborts the
    /// whole fill and no partial population is left behind.
    pub fn generate_population<R: Rng>(
        &self,
        rng: &mut R,
        population: &mut Population,
    ) -> Result<()> {
        population.species.clear();
        population.species.push(Species::default());
        let species_idx = 0;

        let shared = Mutex::new(FillState::default());
        let slots = self.config.population_size;
        log::debug!("filling population: {} slots", slots);

        let sequential =
            self.scorer.requires_single_thread() || self.config.thread_count <= 1;
        let outcome = if sequential {
            self.fill_sequential(rng, &shared, slots, species_idx)
        } else {
            self.fill_parallel(&shared, slots, species_idx)
        };
        if let Err(err) = outcome {
            population.species.clear();
            return Err(err);
        }

        let state = shared.into_inner().unwrap();
        log::debug!("population fill complete: {} members", state.members.len());

        let species = &mut population.species[species_idx];
        species.members = state.members;
        // Leader is arbitrarily the first member, not score-based
        species.leader = if species.members.is_empty() {
            None
        } else {
            Some(0)
        };
        Ok(())
    }

    fn fill_sequential<R: Rng>(
        &self,
        rng: &mut R,
        shared: &Mutex<FillState>,
        slots: usize,
        species_idx: usize,
    ) -> Result<()> {
        for _ in 0..slots {
            let program = self.attempt_create_genome(rng, shared)?;
            shared.lock().unwrap().add_member(program, species_idx);
        }
        Ok(())
    }

    fn fill_parallel(
        &self,
        shared: &Mutex<FillState>,
        slots: usize,
        species_idx: usize,
    ) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.thread_count)
            .build()
            .map_err(|e| {
                TreegenError::Configuration(format!("Failed to build worker pool: {}", e))
            })?;

        pool.install(|| {
            (0..slots).into_par_iter().try_for_each(|_| -> Result<()> {
                // Independent generator per task; instances are never shared
                let mut task_rng = self.random_factory.new_rng();
                let program = self.attempt_create_genome(&mut task_rng, shared)?;
                shared.lock().unwrap().add_member(program, species_idx);
                Ok(())
            })
        })
    }

    /// Bounded attempt loop for one slot: build, score, pre-check
    /// uniqueness, retry on rejection
    fn attempt_create_genome<R: Rng>(
        &self,
        rng: &mut R,
        shared: &Mutex<FillState>,
    ) -> Result<Program> {
        for _ in 0..self.config.max_generation_errors {
            let root = self.builder.build(rng)?;
            let mut program = Program::new(root);

            let score = match self.scorer.calculate_score(&program) {
                Ok(score) => score,
                Err(err) => {
                    log::warn!("Scoring fault, rejecting candidate: {:#}", err);
                    f64::NAN
                }
            };
            program.score = score;
            if !score.is_finite() {
                continue;
            }

            let text = program.canonical_text();
            // Pre-check only: the durable reservation happens under the
            // insertion lock, so two concurrent tasks can both pass this
            // check for the same text
            if shared.lock().unwrap().is_duplicate(&text) {
                continue;
            }

            log::debug!(
                "accepted candidate ({:.3}): {}",
                score,
                program.root.to_formula_short(60)
            );
            return Ok(program);
        }
        Err(TreegenError::BudgetExhausted {
            attempts: self.config.max_generation_errors,
        })
    }
}
