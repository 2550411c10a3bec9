//! Utilities.
use anyhow::{anyhow, Result};
use candle_nn::VarMap;
use log::trace;

/// Overwrites the variables of `dest` with those of `src`.
///
/// Variables are identified by their names. Every variable in `dest` must
/// have a counterpart with the same shape in `src`.
pub fn copy_vars(dest: &VarMap, src: &VarMap) -> Result<()> {
    let dest = dest
        .data()
        .lock()
        .map_err(|_| anyhow!("Lock of the destination variables is poisoned"))?;
    let src = src
        .data()
        .lock()
        .map_err(|_| anyhow!("Lock of the source variables is poisoned"))?;

    for (name, v_dest) in dest.iter() {
        trace!("Copy {}", name);
        let v_src = src
            .get(name)
            .ok_or_else(|| anyhow!("Variable {} is missing in the source", name))?;
        v_dest.set(v_src.as_tensor())?;
    }

    Ok(())
}
