//! Main robot-side executable entry point.
//!
//! # Architecture
//!
//! Runs a single autonomous mission against the simulated equipment:
//!
//!     - Initialise the session, logging and parameters
//!     - Initialise the modules and the equipment
//!     - Main loop, at a fixed cadence:
//!         - One executive cycle (follower, sensing, mission, arm control, demands, telemetry)
//!         - Advance the simulated actuators
//!     - Stop everything once the mission is complete
//!
//! The loop is paced in real time unless `--fast` is given, in which case the simulated clock
//! runs as fast as the host allows.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use rob_lib::{
    arm_ctrl::ArmCtrl,
    auto::AutoMgr,
    data_store::DataStore,
    exec::RobExec,
    params::RobExecParams,
    sim::{SimActuator, SimFollower, SimIntake},
    tm_server::TmServer,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Speed of the simulated drive base along a path.
///
/// Units: inches/second
const SIM_FOLLOWER_SPEED_IPS: f64 = 30.0;

/// Speed of the simulated pivot motor at full power.
///
/// Units: ticks/second
const SIM_PIVOT_FREE_SPEED: f64 = 800.0;

/// Speed of the simulated extension motor at full power.
///
/// Units: ticks/second
const SIM_EXT_FREE_SPEED: f64 = 1000.0;

/// Time constant of both simulated motors.
///
/// Units: seconds
const SIM_MOTOR_TAU_S: f64 = 0.05;

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "rob_exec", about = "Runs one autonomous mission in simulation")]
struct Opts {
    /// Don't pace the loop in real time
    #[structopt(long)]
    fast: bool,

    /// Override the maximum number of cycles from the parameters
    #[structopt(long)]
    max_cycles: Option<u64>,

    /// Directory, relative to the software root, in which the session is created
    #[structopt(long, default_value = "sessions")]
    sessions_dir: String,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Parameters are needed first to select the log level
    let exec_params: RobExecParams =
        util::params::load("rob_exec.toml").wrap_err("Could not load exec params")?;

    if !(exec_params.cycle_period_s > 0.0) {
        return Err(eyre!(
            "The cycle period must be positive, found {}",
            exec_params.cycle_period_s
        ));
    }

    // Initialise session
    let session = Session::new("rob_exec", &opts.sessions_dir)
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::from(exec_params.log_level), &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Arm Robot Executable\n");
    info!(
        "Software root: {:?}",
        host::get_sw_root().wrap_err("Failed to get the software root")?
    );
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opts);

    let max_cycles = opts.max_cycles.unwrap_or(exec_params.max_cycles);

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut arm_ctrl = ArmCtrl::default();
    arm_ctrl
        .init("arm_ctrl.toml", &session)
        .wrap_err("Failed to initialise ArmCtrl")?;
    info!("ArmCtrl init complete");

    let auto_mgr = AutoMgr::init("auto_mgr.toml").wrap_err("Failed to initialise AutoMgr")?;
    info!("AutoMgr init complete");

    let ds = DataStore::new(arm_ctrl, auto_mgr);

    info!("Module initialisation complete\n");

    // ---- INITIALISE EQUIPMENT ----

    let mut exec = RobExec::new(
        ds,
        SimActuator::new("pivot", SIM_PIVOT_FREE_SPEED, SIM_MOTOR_TAU_S),
        SimActuator::new("extension", SIM_EXT_FREE_SPEED, SIM_MOTOR_TAU_S),
        SimIntake::new(),
        SimFollower::new(SIM_FOLLOWER_SPEED_IPS, exec_params.cycle_period_s),
        TmServer::new(),
    );

    exec.init().wrap_err("Failed to initialise the equipment")?;
    exec.start(0.0).wrap_err("Failed to start the mission")?;

    info!("Equipment initialisation complete");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);
    let mut num_cycles: u64 = 0;

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        num_cycles += 1;

        // Simulated time, so that fast and paced runs behave identically
        let now_s = num_cycles as f64 * exec_params.cycle_period_s;

        // The executive has already made everything safe if the cycle failed
        if let Err(e) = exec.cycle(now_s) {
            warn!("Cycle {} failed: {}", num_cycles, e);
        }

        // ---- SIMULATION ----

        exec.pivot_mut().step(exec_params.cycle_period_s);
        exec.extension_mut().step(exec_params.cycle_period_s);

        // ---- END CONDITIONS ----

        if exec.ds.auto_mgr.is_complete() {
            info!("Mission complete after {} cycles ({:.2} s)", num_cycles, now_s);
            break;
        }

        if num_cycles >= max_cycles {
            warn!("Maximum number of cycles ({}) reached, stopping", max_cycles);
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        if opts.fast {
            continue;
        }

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
            ),
        }
    }

    // ---- SHUTDOWN ----

    exec.stop();

    info!(
        "Final arm position: pivot {:.1} ticks, extension {:.1} ticks",
        exec.pivot().position(),
        exec.extension().position()
    );
    info!("{} telemetry packets sent", exec.tm().num_packets());
    info!("End of execution");

    session.exit();

    Ok(())
}
