//! Integration tests for the column-generation loop against scripted
//! master-problem and pricer stubs.

use shift_opt::config::Config;
use shift_opt::instance::{Instance, Stop};
use shift_opt::master::{ColumnGeneration, MasterError, MasterProblem};
use shift_opt::pricing::{Pricer, PricingHeuristic};
use shift_opt::shift::Shift;
use std::cell::RefCell;

fn create_line_instance() -> Instance {
    let n = 8;
    let mut stops = vec![Stop::new(0, false, 0.0, 0.0, 0.0)];
    for i in 1..n {
        stops.push(Stop::new(i, false, 5.0, i as f64 * 10.0, 0.0));
    }
    let travel = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| ((i as f64) - (j as f64)).abs() * 10.0)
                .collect()
        })
        .collect();
    match Instance::new(stops, travel) {
        Ok(instance) => instance,
        Err(e) => panic!("test instance: {e}"),
    }
}

/// Master stub that replays a fixed dual vector and records columns.
struct ScriptedMaster {
    columns: Vec<Shift>,
    duals: Vec<f64>,
    solves: usize,
    fail_with: Option<MasterError>,
}

impl ScriptedMaster {
    fn new(duals: Vec<f64>) -> Self {
        ScriptedMaster {
            columns: Vec::new(),
            duals,
            solves: 0,
            fail_with: None,
        }
    }
}

impl MasterProblem for ScriptedMaster {
    fn add_columns(&mut self, columns: Vec<Shift>) {
        self.columns.extend(columns);
    }

    fn solve(&mut self) -> Result<(), MasterError> {
        self.solves += 1;
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn duals(&self) -> Vec<f64> {
        self.duals.clone()
    }
}

/// Pricer stub returning one scripted batch per round.
struct ScriptedPricer {
    batches: RefCell<Vec<Vec<Shift>>>,
}

impl ScriptedPricer {
    fn new(mut batches: Vec<Vec<Shift>>) -> Self {
        // Pop from the back per round.
        batches.reverse();
        ScriptedPricer {
            batches: RefCell::new(batches),
        }
    }
}

impl Pricer for ScriptedPricer {
    fn price(&self, _instance: &Instance, _duals: &[f64]) -> Vec<Shift> {
        self.batches.borrow_mut().pop().unwrap_or_default()
    }
}

#[test]
fn test_loop_stops_when_pricer_comes_back_empty() {
    let instance = create_line_instance();
    let overhead = 30.0;

    let initial = vec![Shift::new(vec![0, 1, 2, 0], &instance, overhead)];
    let batch = vec![
        Shift::new(vec![0, 3, 4, 0], &instance, overhead),
        Shift::new(vec![0, 5, 0], &instance, overhead),
    ];
    let pricer = ScriptedPricer::new(vec![batch, Vec::new()]);
    let master = ScriptedMaster::new(vec![0.0; instance.n_stops()]);

    let mut generation = ColumnGeneration::new(master, pricer, 10);
    let report = match generation.run(&instance, initial) {
        Ok(report) => report,
        Err(e) => panic!("column generation failed: {e}"),
    };

    // Round 1 adds two columns, round 2 prices empty and converges.
    assert_eq!(report.rounds, 2);
    assert_eq!(report.columns_added, 3);

    let master = generation.into_master();
    assert_eq!(master.solves, 2);
    assert_eq!(master.columns.len(), 3);
}

#[test]
fn test_loop_respects_round_limit() {
    let instance = create_line_instance();
    let overhead = 30.0;

    // A pricer that never runs dry.
    let batches = (0..20)
        .map(|_| vec![Shift::new(vec![0, 1, 0], &instance, overhead)])
        .collect();
    let pricer = ScriptedPricer::new(batches);
    let master = ScriptedMaster::new(vec![0.0; instance.n_stops()]);

    let mut generation = ColumnGeneration::new(master, pricer, 3);
    let report = match generation.run(&instance, Vec::new()) {
        Ok(report) => report,
        Err(e) => panic!("column generation failed: {e}"),
    };

    assert_eq!(report.rounds, 3);
    assert_eq!(report.columns_added, 3);
}

#[test]
fn test_infeasible_master_stops_the_loop() {
    let instance = create_line_instance();

    let mut master = ScriptedMaster::new(vec![0.0; instance.n_stops()]);
    master.fail_with = Some(MasterError::Infeasible);
    let pricer = ScriptedPricer::new(Vec::new());

    let mut generation = ColumnGeneration::new(master, pricer, 10);
    let result = generation.run(&instance, Vec::new());
    assert_eq!(result.unwrap_err(), MasterError::Infeasible);
}

#[test]
fn test_real_pricer_converges_on_zero_duals() {
    let instance = create_line_instance();
    let config = Config::new()
        .with_max_shift_duration(200.0)
        .with_min_shift_duration(0.0)
        .with_fixed_overhead(30.0);

    // With zero duals no column can price out negative, so the loop
    // converges after a single master solve.
    let pricer = PricingHeuristic::new(&config);
    let master = ScriptedMaster::new(vec![0.0; instance.n_stops()]);

    let mut generation = ColumnGeneration::new(master, pricer, 5);
    let report = match generation.run(&instance, Vec::new()) {
        Ok(report) => report,
        Err(e) => panic!("column generation failed: {e}"),
    };
    assert_eq!(report.rounds, 1);
    assert_eq!(report.columns_added, 0);
}
