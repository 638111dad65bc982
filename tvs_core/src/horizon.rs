/*
This file is part of the Building Aggregration Tool
Copyright (C) 2022 Novel-T

The Building Aggregration Tool is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/
use std::f32::consts::PI;

/// Tuning knobs the horizon kernel needs that don't change slot to slot:
/// the edge-artifact discard rule, the curvature correction, and the
/// optional volumetric accumulation (spec.md §4.3, plus the supplemented
/// `sweepV`/`kernelV` path).
#[derive(Debug, Clone, Copy)]
pub struct HorizonConfig {
    pub cell_scale: f64,
    pub discard_short_rings: bool,
    pub short_ring_threshold: f32,
    pub curved_earth: bool,
    pub earth_radius_cells: f64,
    pub compute_volume: bool,
}

/// One ring sector: the [opening, closing) pair of neighbours whose
/// elevation angles bracket a visible arc, spec.md §3's "Ring sector".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingSector {
    pub opening_id: u32,
    pub closing_id: u32,
}

#[derive(Debug, Clone, Default)]
pub struct DirectionResult {
    pub surface: f32,
    pub volume: f32,
    pub rings: Vec<RingSector>,
}

/// A single neighbour step fed to [`sweep_direction`]: its dense id, its
/// unsigned distance from the point of view along the sweep direction, and
/// its raw elevation.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub id: u32,
    pub delta_d: f32,
    pub elevation: f32,
}

/// Runs the horizon kernel (C5) outward from a point of view in one
/// direction (forward or backward along the Band of Sight), tracking the
/// running maximum elevation angle and emitting a ring sector every time
/// visibility toggles. Ported from `Sector::sweepS`/`kernelS`/`closeprof`
/// (surface) and `sweepV`/`kernelV` (volume, when `cfg.compute_volume`).
///
/// `pov_elevation` must already include the observer height offset
/// (`PoV.elev + observer_height` in spec.md §4.3). `pov_id` seeds the
/// opening id of a ring that stays visible from the first neighbor on
/// (nothing ever triggers an "opening" event to overwrite it) — the
/// original seeds `rsF[0][0]`/`rsB[0][0]` with the point of view's own
/// index before the sweep starts, for the same reason.
pub fn sweep_direction(
    pov_elevation: f32,
    pov_id: u32,
    neighbors: impl Iterator<Item = Neighbor>,
    cfg: &HorizonConfig,
) -> DirectionResult {
    let mut visible = true;
    let mut max_angle = f32::NEG_INFINITY;
    let mut open_d: f32 = 0.0;
    let mut open_h: f32 = 0.0;
    let mut open_id: u32 = pov_id;
    let mut last_d: f32 = 0.0;
    let mut last_h: f32 = 0.0;
    let mut last_id: u32 = 0;
    let mut any = false;

    let mut surface = 0.0f32;
    let mut volume = 0.0f32;
    let mut rings = Vec::new();

    for neighbor in neighbors {
        any = true;
        let mut delta_h = neighbor.elevation - pov_elevation;
        if cfg.curved_earth {
            let r = cfg.earth_radius_cells as f32;
            delta_h -= (neighbor.delta_d * neighbor.delta_d) / (2.0 * r);
        }
        let angle = delta_h / neighbor.delta_d;
        let above = angle > max_angle;

        if above && !visible {
            open_d = neighbor.delta_d;
            open_h = delta_h;
            open_id = neighbor.id;
        }
        if visible && !above {
            surface += neighbor.delta_d * neighbor.delta_d - open_d * open_d;
            if cfg.compute_volume {
                volume += volume_increment(open_d, open_h, neighbor.delta_d, delta_h);
            }
            rings.push(RingSector {
                opening_id: open_id,
                closing_id: neighbor.id,
            });
        }

        visible = above;
        max_angle = max_angle.max(angle);
        last_d = neighbor.delta_d;
        last_h = delta_h;
        last_id = neighbor.id;
    }

    if any && visible {
        surface += last_d * last_d - open_d * open_d;
        if cfg.compute_volume {
            volume += volume_increment(open_d, open_h, last_d, last_h);
        }
        rings.push(RingSector {
            opening_id: open_id,
            closing_id: last_id,
        });
    }

    if cfg.discard_short_rings && rings.len() == 1 && last_d < cfg.short_ring_threshold {
        rings.clear();
        surface = 0.0;
        volume = 0.0;
    }

    let surface_scale = PI / (360.0 * (cfg.cell_scale * cfg.cell_scale) as f32);
    surface *= surface_scale;
    if cfg.compute_volume {
        let volume_scale = surface_scale / (3.0 * cfg.cell_scale as f32);
        volume *= volume_scale;
    }

    DirectionResult {
        surface,
        volume,
        rings,
    }
}

/// The frustum-slice volume between two consecutive horizon samples:
/// `(Δd + open_d) * |open_d*Δd - Δh*open_h|`. The original `kernelV`
/// (`src/Sector.cpp`) instead multiplies `open_delta_d` by both `delta_d`
/// and `delta_h`, which drops the closing sample's distance out of the
/// cross term entirely; this uses the symmetric cross term spec.md's
/// horizon kernel contract calls for.
fn volume_increment(open_d: f32, open_h: f32, delta_d: f32, delta_h: f32) -> f32 {
    let mean = delta_d + open_d;
    mean * (open_d * delta_d - delta_h * open_h).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> HorizonConfig {
        HorizonConfig {
            cell_scale: 1.0,
            discard_short_rings: false,
            short_ring_threshold: 1.5,
            curved_earth: false,
            earth_radius_cells: 1.0,
            compute_volume: false,
        }
    }

    #[test]
    fn flat_terrain_stays_visible_with_one_ring() {
        let neighbors = (1..=5).map(|d| Neighbor {
            id: d as u32,
            delta_d: d as f32,
            elevation: 0.0,
        });
        let result = sweep_direction(0.0, 99, neighbors, &cfg());
        assert_eq!(result.rings.len(), 1);
        assert!(result.surface > 0.0);
        assert_eq!(result.rings[0].opening_id, 99);
    }

    #[test]
    fn a_spike_then_a_dip_produces_two_rings() {
        let steps = vec![(1.0, 50.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)];
        let neighbors = steps.into_iter().enumerate().map(|(i, (d, h))| Neighbor {
            id: i as u32,
            delta_d: d,
            elevation: h,
        });
        let result = sweep_direction(0.0, 99, neighbors, &cfg());
        assert_eq!(result.rings.len(), 2);
    }

    #[test]
    fn short_terminal_ring_is_discarded_when_enabled() {
        let mut c = cfg();
        c.discard_short_rings = true;
        let neighbors = vec![Neighbor {
            id: 0,
            delta_d: 1.0,
            elevation: 0.0,
        }]
        .into_iter();
        let result = sweep_direction(0.0, 99, neighbors, &c);
        assert!(result.rings.is_empty());
        assert_eq!(result.surface, 0.0);
    }

    #[test]
    fn empty_neighbor_sequence_yields_no_rings() {
        let result = sweep_direction(0.0, 99, std::iter::empty(), &cfg());
        assert!(result.rings.is_empty());
        assert_eq!(result.surface, 0.0);
    }
}
