//! # Control Cycle Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use comms_if::tm::NullTm;
use rob_lib::{
    arm_ctrl::{self, ArmCtrl},
    auto::{auto_mgr::AutoMgrParams, AutoMgr},
    data_store::DataStore,
    exec::RobExec,
    motion_profile::{MotionState, ProfileConstraints, TrapezoidProfile},
    sim::{SimActuator, SimFollower, SimIntake},
};

const DT: f64 = 0.02;

fn control_cycle_benchmark(c: &mut Criterion) {
    // ---- Build the executive against the simulated equipment ----

    let arm_params: arm_ctrl::Params =
        util::params::parse(include_str!("../../params/arm_ctrl.toml")).unwrap();
    let auto_params: AutoMgrParams =
        util::params::parse(include_str!("../../params/auto_mgr.toml")).unwrap();

    let ds = DataStore::new(
        ArmCtrl::new(arm_params).unwrap(),
        AutoMgr::new(auto_params).unwrap(),
    );

    let mut exec = RobExec::new(
        ds,
        SimActuator::new("pivot", 800.0, 0.05),
        SimActuator::new("extension", 1000.0, 0.05),
        SimIntake::new(),
        SimFollower::new(30.0, DT),
        NullTm,
    );
    exec.init().unwrap();
    exec.start(0.0).unwrap();

    let mut num_cycles = 0u64;

    c.bench_function("RobExec::cycle", |b| {
        b.iter(|| {
            num_cycles += 1;
            exec.cycle(num_cycles as f64 * DT).unwrap();
            exec.pivot_mut().step(DT);
            exec.extension_mut().step(DT);
        })
    });

    // ---- Profile generation ----

    let constraints = ProfileConstraints::new(500.0, 100.0).unwrap();

    c.bench_function("TrapezoidProfile::new+sample", |b| {
        b.iter(|| {
            let profile = TrapezoidProfile::new(
                black_box(MotionState::new(-120.0, 35.0)),
                black_box(-2440.0),
                constraints,
            );
            profile.sample(black_box(0.5 * profile.duration()))
        })
    });
}

criterion_group!(benches, control_cycle_benchmark);
criterion_main!(benches);
