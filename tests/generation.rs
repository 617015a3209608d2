use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use treegen::opcodes::primitives::{Add, FloatConst};
use treegen::{
    EntropyFactory, ExprNode, GenerationConfig, GrowthStrategy, OpcodeClass, OpcodeRegistry,
    Population, Program, Scorer, SeedSequenceFactory, TreeGenerator, TreegenError, TypeSet, Value,
    ValueType,
};

/// Deterministic scorer: bigger trees score higher
struct NodeCountScorer;

impl Scorer for NodeCountScorer {
    fn calculate_score(&self, program: &Program) -> anyhow::Result<f64> {
        Ok(program.root.node_count() as f64)
    }
}

/// Scorer that never accepts anything, counting its invocations
struct NanScorer {
    calls: AtomicUsize,
}

impl Scorer for NanScorer {
    fn calculate_score(&self, _program: &Program) -> anyhow::Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(f64::NAN)
    }
}

/// Scorer whose every call is a runtime fault
struct FaultingScorer;

impl Scorer for FaultingScorer {
    fn calculate_score(&self, _program: &Program) -> anyhow::Result<f64> {
        anyhow::bail!("collaborator blew up")
    }
}

fn generator(
    config: GenerationConfig,
    registry: OpcodeRegistry,
    strategy: GrowthStrategy,
) -> TreeGenerator {
    TreeGenerator::new(
        config,
        Arc::new(registry),
        strategy,
        Arc::new(NodeCountScorer),
        Arc::new(EntropyFactory),
    )
    .expect("generator construction")
}

fn walk(node: &ExprNode, check: &mut impl FnMut(&ExprNode)) {
    check(node);
    for child in &node.children {
        walk(child, check);
    }
}

/// Concrete type set a subtree can actually produce, inferred bottom-up
fn concrete_types(node: &ExprNode) -> TypeSet {
    if node.children.is_empty() {
        return node.opcode.output_types();
    }
    if node.opcode.class() == OpcodeClass::Operator {
        let mut common = concrete_types(&node.children[0]);
        for child in &node.children[1..] {
            common = common.intersect(&concrete_types(child));
        }
        // Comparisons take numeric children but yield Bool
        if node.opcode.output_types().intersects(&common) {
            common
        } else {
            node.opcode.output_types()
        }
    } else {
        node.opcode.output_types()
    }
}

#[test]
fn generated_trees_satisfy_structural_invariants() {
    let config = GenerationConfig {
        max_depth: 6,
        population_size: 1,
        ..Default::default()
    };
    let (min_const, max_const) = (config.min_const, config.max_const);
    let gen = generator(
        config,
        OpcodeRegistry::standard(ValueType::Float),
        GrowthStrategy::Grow,
    );
    let mut rng = StdRng::seed_from_u64(101);

    for _ in 0..50 {
        let program = gen.generate(&mut rng).unwrap();
        assert!(program.depth() <= 6, "depth {} over ceiling", program.depth());

        walk(&program.root, &mut |node| {
            assert_eq!(node.children.len(), node.opcode.arity());
            match &node.payload {
                Some(Value::Float(v)) => {
                    assert!(*v >= min_const && *v <= max_const, "literal {} out of bounds", v)
                }
                Some(Value::Integer(v)) => {
                    assert!(*v as f64 >= min_const && *v as f64 <= max_const)
                }
                _ => {}
            }
        });
    }
}

#[test]
fn operator_children_share_one_concrete_type() {
    let config = GenerationConfig {
        max_depth: 6,
        ..Default::default()
    };
    let gen = generator(
        config,
        OpcodeRegistry::standard(ValueType::Bool),
        GrowthStrategy::Grow,
    );
    let mut rng = StdRng::seed_from_u64(202);

    for _ in 0..50 {
        let program = gen.generate(&mut rng).unwrap();
        walk(&program.root, &mut |node| {
            if node.opcode.class() == OpcodeClass::Operator && node.children.len() >= 2 {
                let sets: Vec<TypeSet> = node.children.iter().map(concrete_types).collect();

                let mut common = sets[0].clone();
                for set in &sets[1..] {
                    common = common.intersect(set);
                }
                assert!(
                    !common.is_empty(),
                    "children of '{}' not homogenized in {}",
                    node.opcode.alias(),
                    program.canonical_text()
                );

                // Children whose subtree pins a single concrete type must
                // all agree on it
                let singles: Vec<&TypeSet> = sets.iter().filter(|s| s.len() == 1).collect();
                for pair in singles.windows(2) {
                    assert_eq!(
                        pair[0], pair[1],
                        "heterogeneous children under '{}' in {}",
                        node.opcode.alias(),
                        program.canonical_text()
                    );
                }
            }
        });
    }
}

#[test]
fn full_strategy_expands_to_the_depth_limit() {
    let config = GenerationConfig {
        max_depth: 4,
        ..Default::default()
    };
    let gen = generator(
        config,
        OpcodeRegistry::standard(ValueType::Float),
        GrowthStrategy::Full,
    );
    let mut rng = StdRng::seed_from_u64(303);

    for _ in 0..30 {
        let program = gen.generate(&mut rng).unwrap();
        assert_eq!(program.depth(), 4, "{}", program.canonical_text());
    }
}

#[test]
fn sequential_generation_is_deterministic() {
    let config = GenerationConfig {
        max_depth: 5,
        population_size: 12,
        thread_count: 1,
        ..Default::default()
    };

    let texts = |seed: u64| -> Vec<String> {
        let gen = generator(
            config.clone(),
            OpcodeRegistry::standard(ValueType::Float),
            GrowthStrategy::Grow,
        );
        let mut rng = StdRng::seed_from_u64(seed);
        let mut population = Population::new();
        gen.generate_population(&mut rng, &mut population).unwrap();
        population.species[0]
            .members
            .iter()
            .map(Program::canonical_text)
            .collect()
    };

    assert_eq!(texts(777), texts(777));
    assert_ne!(texts(777), texts(778));
}

#[test]
fn empty_registry_is_a_configuration_error() {
    let result = TreeGenerator::new(
        GenerationConfig::default(),
        Arc::new(OpcodeRegistry::new(ValueType::Float)),
        GrowthStrategy::Grow,
        Arc::new(NodeCountScorer),
        Arc::new(EntropyFactory),
    );
    assert!(matches!(result, Err(TreegenError::Configuration(_))));
}

#[test]
fn unscoreable_population_exhausts_exactly_the_attempt_budget() {
    let scorer = Arc::new(NanScorer {
        calls: AtomicUsize::new(0),
    });
    let config = GenerationConfig {
        max_depth: 3,
        population_size: 4,
        max_generation_errors: 25,
        ..Default::default()
    };
    let gen = TreeGenerator::new(
        config,
        Arc::new(OpcodeRegistry::standard(ValueType::Float)),
        GrowthStrategy::Grow,
        Arc::clone(&scorer) as Arc<dyn Scorer>,
        Arc::new(EntropyFactory),
    )
    .unwrap();

    let mut rng = StdRng::seed_from_u64(404);
    let mut population = Population::new();
    let result = gen.generate_population(&mut rng, &mut population);

    assert!(matches!(
        result,
        Err(TreegenError::BudgetExhausted { attempts: 25 })
    ));
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 25);
    // No partial population survives a failed fill
    assert_eq!(population.member_count(), 0);
}

#[test]
fn scoring_faults_are_recovered_not_surfaced() {
    let config = GenerationConfig {
        max_depth: 3,
        max_generation_errors: 10,
        ..Default::default()
    };
    let gen = TreeGenerator::new(
        config,
        Arc::new(OpcodeRegistry::standard(ValueType::Float)),
        GrowthStrategy::Grow,
        Arc::new(FaultingScorer),
        Arc::new(EntropyFactory),
    )
    .unwrap();

    let mut rng = StdRng::seed_from_u64(505);
    // Every attempt faults, gets the NaN sentinel, and is rejected; the
    // caller only ever sees the budget error
    assert!(matches!(
        gen.generate(&mut rng),
        Err(TreegenError::BudgetExhausted { attempts: 10 })
    ));
}

// --- Grammar scenarios ---

#[test]
fn single_terminal_grammar_yields_exactly_that_terminal() {
    let mut registry = OpcodeRegistry::new(ValueType::Float);
    registry.register(Arc::new(FloatConst));

    let config = GenerationConfig {
        max_depth: 1,
        min_const: 0.0,
        max_const: 0.0,
        ..Default::default()
    };
    let gen = generator(config, registry, GrowthStrategy::Grow);
    let mut rng = StdRng::seed_from_u64(606);

    for _ in 0..20 {
        let program = gen.generate(&mut rng).unwrap();
        assert_eq!(program.canonical_text(), "0");
        assert_eq!(program.depth(), 1);
    }
}

/// expr := number | "(" expr " + " expr ")"
fn parse_expr(s: &str) -> Option<&str> {
    let s = s.trim_start();
    if let Some(rest) = s.strip_prefix('(') {
        let rest = parse_expr(rest)?;
        let rest = rest.trim_start().strip_prefix('+')?;
        let rest = parse_expr(rest)?;
        rest.trim_start().strip_prefix(')')
    } else {
        let end = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
            .unwrap_or(s.len());
        if end == 0 {
            return None;
        }
        s[..end].parse::<f64>().ok()?;
        Some(&s[end..])
    }
}

#[test]
fn addition_grammar_renders_valid_arithmetic() {
    let mut registry = OpcodeRegistry::new(ValueType::Float);
    registry.register(Arc::new(Add));
    registry.register(Arc::new(FloatConst));

    let config = GenerationConfig {
        max_depth: 3,
        min_const: -10.0,
        max_const: 10.0,
        ..Default::default()
    };
    let gen = generator(config, registry, GrowthStrategy::Grow);
    let mut rng = StdRng::seed_from_u64(707);

    for _ in 0..40 {
        let program = gen.generate(&mut rng).unwrap();
        assert!(program.depth() <= 3);

        let text = program.canonical_text();
        let rest = parse_expr(&text).unwrap_or_else(|| panic!("unparseable formula: {}", text));
        assert!(rest.is_empty(), "trailing input in: {}", text);

        walk(&program.root, &mut |node| {
            assert!(matches!(node.opcode.alias(), "+" | "const"));
            if let Some(Value::Float(v)) = &node.payload {
                assert!(*v >= -10.0 && *v <= 10.0);
            }
        });
    }
}

#[test]
fn single_program_surface_respects_its_own_dedup_set() {
    // Repeated single-program generation uses a private dedup set per call,
    // so identical outputs across calls are legal
    let mut registry = OpcodeRegistry::new(ValueType::Float);
    registry.register(Arc::new(FloatConst));
    let config = GenerationConfig {
        max_depth: 1,
        min_const: 3.0,
        max_const: 3.0,
        ..Default::default()
    };
    let gen = generator(config, registry, GrowthStrategy::Full);
    let mut rng = StdRng::seed_from_u64(808);

    let a = gen.generate(&mut rng).unwrap();
    let b = gen.generate(&mut rng).unwrap();
    assert_eq!(a.canonical_text(), b.canonical_text());
}

#[test]
fn seed_sequence_factory_is_reusable_across_generators() {
    let factory = Arc::new(SeedSequenceFactory::new(1234));
    let gen = TreeGenerator::new(
        GenerationConfig {
            max_depth: 4,
            population_size: 8,
            thread_count: 2,
            ..Default::default()
        },
        Arc::new(OpcodeRegistry::standard(ValueType::Float)),
        GrowthStrategy::Grow,
        Arc::new(NodeCountScorer),
        factory,
    )
    .unwrap();

    let mut rng = StdRng::seed_from_u64(909);
    let mut population = Population::new();
    gen.generate_population(&mut rng, &mut population).unwrap();
    assert_eq!(population.member_count(), 8);
}
