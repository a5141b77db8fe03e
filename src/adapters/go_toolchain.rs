//! `SystemGoToolchain`: shells out to `go env GOVERSION` to detect the
//! installed toolchain version, in the same spawn-and-parse style as
//! `process_git`'s `run` helper, minus the error plumbing — a missing or
//! unparseable toolchain is `None`, not an `Error`.

use std::process::Command;

use crate::goworkspace::parse_go_version;
use crate::ports::GoToolchain;

pub struct SystemGoToolchain;

impl GoToolchain for SystemGoToolchain {
    fn detect_version(&self) -> Option<String> {
        let output = Command::new("go").args(["env", "GOVERSION"]).output().ok()?;
        if !output.status.success() {
            return None;
        }
        parse_go_version(&String::from_utf8_lossy(&output.stdout))
    }
}
