//! Backends and sessions against compiled selection problems.

use std::io::Write;

use qsel_qubo::{QuboCompiler, SelectionTemplate, compile};
use qsel_solve::{
    ExhaustiveSolver, QuadraticBinarySolver, Session, SessionConfig, SimulatedAnnealer,
    SolveError, SolverRegistry,
};

const COSTS: [f64; 5] = [4.0, 3.0, 7.0, 2.0, 9.0];

#[tokio::test]
async fn both_backends_pick_the_cheapest_item() {
    let compiled = compile(5, &COSTS, 50.0).unwrap();
    let backends: Vec<Box<dyn QuadraticBinarySolver>> = vec![
        Box::new(ExhaustiveSolver::new()),
        Box::new(SimulatedAnnealer::new().with_seed(1)),
    ];

    for backend in backends {
        let solution = backend.solve(&compiled.qubo).await.unwrap();
        let selection = compiled.decode(&solution.assignment).unwrap();
        assert_eq!(selection, compiled.optimum(), "backend {}", backend.name());
        assert_eq!(solution.objective, 2.0);
    }
}

#[tokio::test]
async fn exhaustive_matches_sorting_on_many_instances() {
    let solver = ExhaustiveSolver::new();
    for seed in 0..20u64 {
        let n = 2 + (seed as usize % 8);
        let costs: Vec<f64> = (0..n)
            .map(|i| ((seed * 31 + i as u64 * 17) % 23) as f64 - 5.0)
            .collect();
        let penalty = costs.iter().map(|c| c.abs()).sum::<f64>() + 1.0;
        let compiled = compile(n, &costs, penalty).unwrap();

        let solution = solver.solve(&compiled.qubo).await.unwrap();
        let selection = compiled.decode(&solution.assignment).unwrap();
        assert!(selection.feasible, "seed {seed}");
        assert_eq!(selection.cost, compiled.optimum().cost, "seed {seed}");
    }
}

#[tokio::test]
async fn choose_two_on_exhaustive() {
    let compiled = QuboCompiler::default()
        .with_template(SelectionTemplate::choose(2))
        .compile(5, &COSTS, 50.0)
        .unwrap();
    let solution = ExhaustiveSolver::new().solve(&compiled.qubo).await.unwrap();
    assert_eq!(solution.selected(), vec![1, 3]);
    assert_eq!(solution.objective, 5.0);
}

#[tokio::test]
async fn session_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "backend: anneal\nseed: 5\nreads: 4\nsweeps: 300").unwrap();

    let config = SessionConfig::from_yaml_file(file.path()).unwrap();
    let registry = SolverRegistry::with_builtins();
    let mut session = Session::open(config, &registry).unwrap();
    assert_eq!(session.backend(), "anneal");
    assert!(session.solver().capabilities().stochastic);

    let compiled = compile(5, &COSTS, 50.0).unwrap();
    let (_, selection) = session.solve_compiled(&compiled).await.unwrap();
    assert_eq!(selection.selected, vec![3]);

    let summary = session.close();
    assert_eq!(summary.backend, "anneal");
    assert_eq!(summary.solves, 1);
}

#[tokio::test]
async fn sessions_are_independent() {
    let registry = SolverRegistry::with_builtins();
    let mut a = Session::open(SessionConfig::new("exhaustive"), &registry).unwrap();
    let b = Session::open(SessionConfig::new("exhaustive"), &registry).unwrap();
    assert_ne!(a.id(), b.id());

    let compiled = compile(3, &[1.0, 2.0, 3.0], 10.0).unwrap();
    a.solve(&compiled.qubo).await.unwrap();
    assert_eq!(a.close().solves, 1);
    assert_eq!(b.close().solves, 0);
}

#[tokio::test]
async fn custom_backend_registration() {
    let mut registry = SolverRegistry::new();
    registry.register("small", |_| {
        let solver: Box<dyn QuadraticBinarySolver> = Box::new(ExhaustiveSolver::with_max_vars(3));
        Ok(solver)
    });
    let mut session = Session::open(SessionConfig::new("small"), &registry).unwrap();

    let compiled = compile(4, &[1.0, 2.0, 3.0, 4.0], 20.0).unwrap();
    assert!(matches!(
        session.solve(&compiled.qubo).await,
        Err(SolveError::ProblemTooLarge { num_vars: 4, limit: 3 })
    ));
}

#[tokio::test]
async fn solution_serializes() {
    let compiled = compile(5, &COSTS, 50.0).unwrap();
    let solution = ExhaustiveSolver::new().solve(&compiled.qubo).await.unwrap();
    let json = serde_json::to_value(&solution).unwrap();
    assert_eq!(json["solver"], "exhaustive");
    assert_eq!(json["objective"], 2.0);
    assert_eq!(json["assignment"][3], true);
}

#[tokio::test]
async fn exhaustive_limit_beyond_enumeration_is_rejected() {
    let registry = SolverRegistry::with_builtins();
    let config = SessionConfig::from_yaml_str("backend: exhaustive\nmax_vars: 64\n").unwrap();
    assert!(matches!(
        Session::open(config, &registry),
        Err(SolveError::InvalidParameter(_))
    ));

    let config = SessionConfig::from_yaml_str("backend: exhaustive\nmax_vars: 63\n").unwrap();
    let mut session = Session::open(config, &registry).unwrap();
    let compiled = compile(5, &COSTS, 50.0).unwrap();
    let (_, selection) = session.solve_compiled(&compiled).await.unwrap();
    assert_eq!(selection.selected, vec![3]);
}
