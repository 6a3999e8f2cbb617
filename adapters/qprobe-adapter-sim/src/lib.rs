//! qprobe Local Simulators
//!
//! Exposes the three local simulators as a [`Provider`](qprobe_hal::Provider):
//!
//! | Backend | Purpose | Qubits |
//! |---------|---------|--------|
//! | `statevector_simulator` | Final statevector | 32 |
//! | `unitary_simulator` | Circuit unitary | 16 |
//! | `qasm_simulator` | Shot-based counts | 32 |
//!
//! The handles are descriptive only: they report a static configuration,
//! are always operational with an empty queue, publish no calibration data
//! and keep no job history.
//!
//! # Example
//!
//! ```ignore
//! use qprobe_adapter_sim::LocalSimulators;
//! use qprobe_hal::{Provider, QASM_SIMULATOR};
//!
//! let local = LocalSimulators::new();
//! let sim = local.get_backend(QASM_SIMULATOR).await?;
//! println!("{} qubits", sim.configuration().n_qubits());
//! ```

mod simulator;

pub use simulator::{LocalSimulators, SimulatorBackend};
