//! Self-contained HTML export of an evaluation trajectory.
//!
//! The QP sequence is embedded as JSON next to a small canvas script, so
//! the artifact opens in any browser with no server or assets.

use anyhow::{Context, Result};
use physics::{Config, Qp};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
struct BodyFrame {
    pos: [f32; 3],
    rot: [f32; 4],
}

#[derive(Serialize)]
struct Trajectory<'a> {
    dt: f32,
    bodies: Vec<&'a str>,
    frames: Vec<Vec<BodyFrame>>,
}

/// Write the trajectory to `path`. One frame per collected QP batch, one
/// entry per body in configuration order.
pub fn save(path: &Path, config: &Config, qp_sequence: &[Vec<Qp>]) -> Result<()> {
    let trajectory = Trajectory {
        dt: config.dt,
        bodies: config.bodies.iter().map(|b| b.name.as_str()).collect(),
        frames: qp_sequence
            .iter()
            .map(|qps| {
                qps.iter()
                    .map(|qp| BodyFrame {
                        pos: qp.pos.to_array(),
                        rot: [qp.rot.w, qp.rot.x, qp.rot.y, qp.rot.z],
                    })
                    .collect()
            })
            .collect(),
    };
    let data = serde_json::to_string(&trajectory)?;
    let page = PAGE_TEMPLATE.replace("__TRAJECTORY__", &data);
    fs::write(path, page).with_context(|| format!("writing trajectory to {}", path.display()))?;
    Ok(())
}

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>trajectory</title></head>
<body>
<canvas id="view" width="800" height="400" style="border:1px solid #999"></canvas>
<input id="frame" type="range" min="0" value="0" style="width:800px">
<pre id="info"></pre>
<script>
const traj = __TRAJECTORY__;
const canvas = document.getElementById('view');
const ctx = canvas.getContext('2d');
const slider = document.getElementById('frame');
slider.max = Math.max(0, traj.frames.length - 1);
function draw(f) {
  ctx.clearRect(0, 0, canvas.width, canvas.height);
  const frame = traj.frames[f] || [];
  frame.forEach((body, i) => {
    const x = canvas.width / 2 + body.pos[0] * 40;
    const y = canvas.height / 2 - body.pos[1] * 40;
    ctx.beginPath();
    ctx.arc(x, y, 6, 0, 2 * Math.PI);
    ctx.fillStyle = `hsl(${(i * 67) % 360},70%,50%)`;
    ctx.fill();
  });
  document.getElementById('info').textContent =
    `frame ${f}/${slider.max}  t=${(f * traj.dt).toFixed(3)}s`;
}
slider.addEventListener('input', () => draw(Number(slider.value)));
draw(0);
</script>
</body>
</html>
"#;
