use num_bigint::{BigInt, BigUint, Sign};
use num_traits::One;

use shiftadd_dag::Graph;

use crate::{build_constant, build_periodic, schedule, Error, OperationSink, PeriodicConstant, Schedule, TimingModel};

/// A multiplier by a constant: its graph, pipeline schedule, and cost report.
#[derive(Clone, Debug)]
pub struct ConstMult {
    name: String,
    constant: BigInt,
    graph: Graph,
    schedule: Schedule,
    total_cost: u64,
    dag_depth: u32,
}

impl ConstMult {
    pub fn new(constant: &BigInt, input_width: u32, timing: &dyn TimingModel) -> Result<ConstMult, Error> {
        let mut graph = Graph::new(input_width)?;
        let root = build_constant(&mut graph, constant)?;
        graph.set_result(root);
        let name = match constant.sign() {
            Sign::Minus => format!("IntConstMult_{input_width}_M{}", constant.magnitude()),
            _ => format!("IntConstMult_{input_width}_{constant}"),
        };
        ConstMult::finish(name, constant.clone(), graph, timing)
    }

    /// Builds a multiplier by the integer a periodic constant denotes, sharing its repeated periods.
    pub fn periodic(
        constant: &PeriodicConstant,
        input_width: u32,
        timing: &dyn TimingModel,
    ) -> Result<ConstMult, Error> {
        let mut graph = Graph::new(input_width)?;
        let root = build_periodic(&mut graph, constant)?;
        graph.set_result(root);
        let name = format!(
            "IntConstMultPeriodic_{input_width}_{}_{}_{}_{}_{}_{}",
            constant.header,
            constant.header.bits(),
            &constant.period << constant.period_lsb_zeroes,
            constant.period_size,
            constant.repeat_i,
            constant.repeat_j.map_or("M1".to_string(), |j| j.to_string()),
        );
        ConstMult::finish(name, BigInt::from(constant.value()), graph, timing)
    }

    fn finish(name: String, constant: BigInt, graph: Graph, timing: &dyn TimingModel) -> Result<ConstMult, Error> {
        let result = graph.result().ok_or(Error::MissingResult)?;
        if cfg!(feature = "trace") {
            eprintln!(">graph for {name}\n{graph}");
        }
        let total_cost = graph.total_cost(result);
        let dag_depth = graph.depth(result);
        tracing::info!("estimated bare cost (not counting pipeline overhead) : {total_cost} FA/LUT");
        tracing::info!("depth of the DAG : {dag_depth}");
        let schedule = schedule(&graph, timing)?;
        tracing::info!(
            "{name}: {} stages, result delay {:e} s",
            schedule.stages(),
            schedule.result_delay()
        );
        Ok(ConstMult { name, constant, graph, schedule, total_cost, dag_depth })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constant(&self) -> &BigInt {
        &self.constant
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn input_width(&self) -> u32 {
        self.graph.input_width()
    }

    pub fn result_width(&self) -> u32 {
        self.graph[self.schedule.result()].bit_width()
    }

    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    pub fn dag_depth(&self) -> u32 {
        self.dag_depth
    }

    pub fn stages(&self) -> u32 {
        self.schedule.stages()
    }

    pub fn emit(&self, sink: &mut dyn OperationSink) {
        self.schedule.replay(&self.graph, sink);
    }

    /// The expected output for input `x`.
    pub fn emulate(&self, x: &BigInt) -> BigInt {
        x * &self.constant
    }

    /// Inputs worth checking on every multiplier: zero, one, two, and the largest input.
    pub fn standard_test_inputs(&self) -> Vec<BigInt> {
        let max_input = BigInt::from((BigUint::one() << self.input_width()) - 1u32);
        let mut inputs: Vec<BigInt> = [0, 1, 2].into_iter().map(BigInt::from).filter(|x| x < &max_input).collect();
        inputs.push(max_input);
        inputs
    }
}
