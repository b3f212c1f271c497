use std::sync::atomic::{AtomicU32, Ordering};

use rayon::iter::{
    IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator,
    IntoParallelRefMutIterator, ParallelIterator,
};

use crate::{agent::Agent, grid, params::Color, params::SimulationParameters};

/// Write `evaporate(current) + deposit(agents)` into `next`.
///
/// Only `current` and `agents` are read and only `next` is written, so the result does not depend
/// on the order in which cells or agents are visited. Agents deposit at the cell under their
/// position as of the start of the tick.
pub fn evaporate_and_deposit(
    width: usize,
    height: usize,
    current: &[Color],
    agents: &[Agent],
    next: &mut [Color],
    params: &SimulationParameters,
) {
    debug_assert_eq!(current.len(), width * height);
    debug_assert_eq!(current.len(), next.len());

    evaporate(current, next, params.evaporation());
    deposit(width, height, agents, next, params.deposition_color);
}

/// Subtract `decay` from every channel of every cell, stopping at zero.
pub fn evaporate(current: &[Color], next: &mut [Color], decay: Color) {
    next.par_iter_mut()
        .zip(current.par_iter())
        .for_each(|(dst, src)| {
            for k in 0..3 {
                dst[k] = (src[k] - decay[k]).max(0.0);
            }
        });
}

/// Add `color` to the cell under every agent. Co-located agents accumulate.
pub fn deposit(width: usize, height: usize, agents: &[Agent], cells: &mut [Color], color: Color) {
    // Agents are first counted per cell, then every cell adds `color` once per hit. Integer counts
    // do not depend on scheduling, so the sums match a sequential scatter bit for bit.
    let hits: Vec<AtomicU32> = (0..cells.len()).map(|_| AtomicU32::new(0)).collect();
    agents.par_iter().for_each(|a| {
        hits[grid::index(width, height, a.x, a.y)].fetch_add(1, Ordering::Relaxed);
    });

    cells
        .par_iter_mut()
        .zip(hits.into_par_iter())
        .for_each(|(cell, n)| {
            for _ in 0..n.into_inner() {
                for k in 0..3 {
                    cell[k] += color[k];
                }
            }
        });
}
