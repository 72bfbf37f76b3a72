//! Compilation engine
//!
//! Drives the backend through a single in-memory emit attempt: parse the
//! source, pick a process-unique module name, emit against the reference
//! set, and hand back either rewound images or the backend's diagnostics.
//! No retries and no partial results.

use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use viewforge_backend::{
    CompilerBackend, Diagnostic, EmitBuffers, ImageBuffer, ResolvedReference,
};

use crate::error::ServiceError;

/// Outcome of one compilation attempt
pub(crate) enum EmitOutcome {
    /// Module image (and symbol image when supported), positioned at start
    Success {
        binary: ImageBuffer,
        symbols: Option<ImageBuffer>,
    },
    /// Backend diagnostics, all severities, in backend order
    Failure(Vec<Diagnostic>),
}

static MODULE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Filename-safe module name, unique within the process
fn synthetic_module_name() -> String {
    let n = MODULE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("vf_dyn_{}_{:06x}", std::process::id(), n)
}

/// Compile one source document into in-memory images
pub(crate) fn compile_unit(
    backend: &dyn CompilerBackend,
    source: &str,
    origin: &str,
    references: &[ResolvedReference],
    symbols_supported: bool,
) -> Result<EmitOutcome, ServiceError> {
    let unit = backend.parse(source, origin);
    let module_name = synthetic_module_name();
    debug!("compiling `{}` as module `{}`", origin, module_name);

    let mut buffers = EmitBuffers::new(symbols_supported);
    let result = backend.emit(unit.as_ref(), &module_name, references, &mut buffers)?;

    if !result.success {
        return Ok(EmitOutcome::Failure(result.diagnostics));
    }

    buffers.rewind();
    Ok(EmitOutcome::Success {
        binary: buffers.binary,
        symbols: buffers.symbols,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use viewforge_vml::VmlBackend;

    #[test]
    fn test_module_names_are_unique() {
        let names: HashSet<String> = (0..64).map(|_| synthetic_module_name()).collect();
        assert_eq!(names.len(), 64);
    }

    #[test]
    fn test_success_rewinds_buffers() {
        let backend = VmlBackend::new();
        let outcome = compile_unit(
            &backend,
            "view Home_View0\n  field title: str\nend\n",
            "views/home.vml",
            &[],
            true,
        )
        .unwrap();

        match outcome {
            EmitOutcome::Success { binary, symbols } => {
                assert_eq!(binary.position(), 0);
                assert!(!binary.is_empty());
                let symbols = symbols.expect("symbol image requested");
                assert_eq!(symbols.position(), 0);
                assert!(!symbols.is_empty());
            }
            EmitOutcome::Failure(_) => panic!("expected success"),
        }
    }

    #[test]
    fn test_symbol_buffer_respects_capability_flag() {
        let backend = VmlBackend::new();
        let outcome = compile_unit(
            &backend,
            "view Home_View0\n  field title: str\nend\n",
            "views/home.vml",
            &[],
            false,
        )
        .unwrap();

        match outcome {
            EmitOutcome::Success { symbols, .. } => assert!(symbols.is_none()),
            EmitOutcome::Failure(_) => panic!("expected success"),
        }
    }

    #[test]
    fn test_failure_carries_all_severities() {
        let backend = VmlBackend::new();
        let outcome = compile_unit(
            &backend,
            "view Home_View0\n  use missing.helper\n  field title: widget\nend\n",
            "views/home.vml",
            &[],
            false,
        )
        .unwrap();

        match outcome {
            EmitOutcome::Failure(diagnostics) => {
                // the unfiltered list still contains the warning
                assert_eq!(diagnostics.len(), 2);
            }
            EmitOutcome::Success { .. } => panic!("expected failure"),
        }
    }
}
