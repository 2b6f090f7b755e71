// Crate entry point. Declare modules so tests and binaries can import them easily.
//
// Responsibilities
// - Only declare and expose modules. No business logic here.

pub mod shared {
    pub mod core {
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod logging;
    }
}

pub mod modules {
    pub mod time_tracking {
        pub mod core {
            pub mod activity;
            pub mod category;
            pub mod fact;
        }
        pub mod adapters {
            pub mod outbound {
                #[cfg(feature = "sql")]
                pub mod sql_store;
                pub mod store;
            }
        }
    }
}

pub mod shell;

pub use shell::config::HamsterConfig;
pub use shell::control::{ControlError, HamsterControl};
