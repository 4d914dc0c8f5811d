// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod dispatcher;
pub mod format;
pub mod history;
pub mod ids;
pub mod model;
pub mod state;

pub use dispatcher::*;
pub use format::*;
pub use history::*;
pub use ids::*;
pub use model::*;
pub use state::*;
