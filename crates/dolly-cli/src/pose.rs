// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use comfy_table::{presets::UTF8_FULL, Table};
use dolly_shot::{solve_pose, FocusVolume, ShotGeometry, ShotParameters};

use crate::cli::PoseArgs;

/// Focus volume from the flags, falling back to the placeholder volume.
pub(crate) fn focus_from_args(args: &PoseArgs) -> FocusVolume {
    let base = FocusVolume::default();
    FocusVolume {
        center: args.center.unwrap_or(base.center),
        radius: args.radius.unwrap_or(base.radius),
        height: args.height.unwrap_or(base.height),
    }
}

fn fmt3(v: glam::Vec3) -> String {
    format!("{:.3}, {:.3}, {:.3}", v.x, v.y, v.z)
}

/// Table of camera poses for `args.samples()`.
pub(crate) fn pose_table(args: &PoseArgs, params: &ShotParameters) -> Table {
    let focus = focus_from_args(args);
    let geometry = ShotGeometry::derive(params, &focus);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["t (s)", "position", "target", "distance"]);
    for t in args.samples() {
        let pose = solve_pose(t, params, &focus);
        table.add_row(vec![
            format!("{t:.2}"),
            fmt3(pose.position),
            fmt3(pose.target),
            format!("{:.3}", pose.position.distance(pose.target)),
        ]);
    }
    tracing::debug!(
        style = %params.style(),
        base_radius = geometry.base_radius,
        rows = table.row_iter().count(),
        "pose table built"
    );
    table
}
