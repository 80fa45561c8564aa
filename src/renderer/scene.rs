//! Scene drawing
//!
//! Turns a [`SceneState`] into a [`DisplayList`]. Reads state only; the same
//! state, time and viewport always produce the same list.

use std::f32::consts::{PI, TAU};

use super::commands::{Composite, DisplayList, DrawCommand, Paint, PathOp, Viewport, stops};
use crate::color::{lighten, with_alpha};
use crate::sim::{BladeTrack, Fruit, Half, Lifecycle, SceneState};

/// Blade glint size (css pixels)
const BLADE_LENGTH: f32 = 420.0;
const BLADE_THICKNESS: f32 = 14.0;
/// Corner radius of the tray
const TRAY_CORNER: f32 = 28.0;
/// Golden angle; spreads fruit pulse phases evenly
const PULSE_PHASE_STEP: f64 = 2.399_963;

/// Draw the full frame
pub fn render_scene(
    state: &SceneState,
    time_ms: f64,
    viewport: Viewport,
    particle_count: usize,
) -> DisplayList {
    let mut list = DisplayList::new();
    draw_background(&mut list, viewport);
    draw_tray(&mut list, viewport);
    for fruit in &state.fruits {
        draw_fruit(&mut list, fruit, time_ms);
    }
    draw_blade(&mut list, &state.blade);
    draw_particles(&mut list, viewport, time_ms, particle_count);
    list
}

fn draw_background(list: &mut DisplayList, vp: Viewport) {
    list.push(DrawCommand::ClearRect {
        x: 0.0,
        y: 0.0,
        w: vp.width,
        h: vp.height,
    });
    list.fill(Paint::Linear {
        from: (0.0, 0.0),
        to: (vp.width, vp.height),
        stops: stops(&[(0.0, "#021520"), (1.0, "#041b2e")]),
    });
    list.push(DrawCommand::FillRect {
        x: 0.0,
        y: 0.0,
        w: vp.width,
        h: vp.height,
    });
}

/// Rounded pad the fruit hover over
fn draw_tray(list: &mut DisplayList, vp: Viewport) {
    let x = vp.width * 0.08;
    let y = vp.height * 0.75;
    let w = vp.width * 0.84;
    let h = vp.height * 0.18;
    let r = TRAY_CORNER;

    list.fill_color("rgba(43, 73, 91, 0.38)");
    list.push(DrawCommand::FillPath(vec![
        PathOp::MoveTo(x + r, y),
        PathOp::LineTo(x + w - r, y),
        PathOp::QuadTo { cx: x + w, cy: y, x: x + w, y: y + r },
        PathOp::LineTo(x + w, y + h - r),
        PathOp::QuadTo { cx: x + w, cy: y + h, x: x + w - r, y: y + h },
        PathOp::LineTo(x + r, y + h),
        PathOp::QuadTo { cx: x, cy: y + h, x, y: y + h - r },
        PathOp::LineTo(x, y + r),
        PathOp::QuadTo { cx: x, cy: y, x: x + r, y },
        PathOp::Close,
    ]));
}

/// Brightness pulse in [0, 1] for a settling fruit
pub fn pulse(time_ms: f64, fruit_id: u32) -> f32 {
    (((time_ms * 0.002 + fruit_id as f64 * PULSE_PHASE_STEP).sin() + 1.0) * 0.5) as f32
}

/// Number of seeds drawn on each half
pub fn seed_count(radius: f32) -> usize {
    (6.0 + radius / 12.0).floor().max(0.0) as usize
}

fn draw_fruit(list: &mut DisplayList, fruit: &Fruit, time_ms: f64) {
    let palette = fruit.kind.palette();
    let r = fruit.radius;

    list.save();
    list.translate(fruit.pos.x, fruit.pos.y);
    list.rotate(fruit.rotation);

    // Soft glow underneath
    list.fill(Paint::Radial {
        inner: (0.0, -r * 0.4, r * 0.3),
        outer: (0.0, 0.0, r * 1.2),
        stops: stops(&[
            (0.0, with_alpha(palette.highlight, 0x44)),
            (1.0, "rgba(0, 0, 0, 0)".to_string()),
        ]),
    });
    list.ellipse(0.0, r * 0.25, r * 1.3, r * 0.5);

    if fruit.state.is_cut() {
        for (index, half) in fruit.halves.iter().enumerate() {
            draw_half(list, fruit, half, index);
        }
    } else {
        list.fill(Paint::Radial {
            inner: (-r * 0.3, -r * 0.45, r * 0.1),
            outer: (0.0, 0.0, r),
            stops: stops(&[
                (0.0, lighten(palette.highlight, 30.0).as_str()),
                (0.55, palette.highlight),
                (1.0, palette.base),
            ]),
        });
        list.shadow(with_alpha(palette.highlight, 0x55), 14.0);
        list.circle(0.0, 0.0, r);
    }
    list.restore();

    if fruit.state == Lifecycle::Settle {
        let beat = pulse(time_ms, fruit.id);
        list.save();
        list.composite(Composite::Lighter);
        list.fill_color(with_alpha(palette.highlight, (70.0 * beat).round() as u8));
        list.circle(fruit.pos.x, fruit.pos.y, r * (1.1 + beat * 0.2));
        list.restore();
    }
}

fn draw_half(list: &mut DisplayList, fruit: &Fruit, half: &Half, index: usize) {
    let palette = fruit.kind.palette();
    let r = fruit.radius;
    let direction = Half::direction(index);
    let separation = half.separation * direction + direction * fruit.slice_progress * 24.0;

    list.save();
    list.translate(separation, half.offset);
    list.rotate(half.angle * (0.4 + fruit.slice_progress * 0.8));

    // Rind
    list.fill(Paint::Linear {
        from: (-r, 0.0),
        to: (r, 0.0),
        stops: stops(&[
            (0.0, lighten(palette.base, 18.0)),
            (0.45, palette.base.to_string()),
            (0.55, lighten(palette.base, 20.0)),
            (1.0, lighten(palette.base, 26.0)),
        ]),
    });
    list.shadow(with_alpha(palette.highlight, 0x55), 16.0);
    list.ellipse_arc(0.0, 0.0, r, r * 0.85, 0.0, PI / 8.0, PI * 1.9);

    // Flesh
    list.fill(Paint::Radial {
        inner: (-r * 0.15, -r * 0.25, r * 0.2),
        outer: (0.0, 0.0, r * 0.75),
        stops: stops(&[
            (0.0, lighten(palette.flesh, 18.0)),
            (0.7, palette.flesh.to_string()),
            (1.0, lighten(palette.base, 12.0)),
        ]),
    });
    list.ellipse(r * 0.15, 0.0, r * 0.8, r * 0.62);

    let seeds = seed_count(r);
    let ring = r * 0.52;
    let twist = if index == 0 { 0.0 } else { PI * 0.1 };
    for i in 0..seeds {
        let theta = (i as f32 / seeds as f32) * PI * 1.05 + twist;
        list.fill_color(palette.seeds);
        list.ellipse_arc(
            theta.cos() * ring * 0.7,
            theta.sin() * ring * 0.38,
            r * 0.05,
            r * 0.12,
            theta,
            0.0,
            TAU,
        );
    }
    list.restore();
}

fn draw_blade(list: &mut DisplayList, blade: &BladeTrack) {
    if !blade.active {
        return;
    }
    let half_len = BLADE_LENGTH / 2.0;
    let half_thick = BLADE_THICKNESS / 2.0;

    list.save();
    list.translate(blade.pos.x, blade.pos.y);
    list.rotate(blade.angle);
    list.fill(Paint::Linear {
        from: (-half_len, 0.0),
        to: (half_len, 0.0),
        stops: stops(&[
            (0.0, "rgba(240, 255, 255, 0)"),
            (0.25, "rgba(199, 255, 255, 0.3)"),
            (0.55, "rgba(255, 255, 255, 0.75)"),
            (0.7, "rgba(199, 255, 255, 0.28)"),
            (1.0, "rgba(240, 255, 255, 0)"),
        ]),
    });
    list.shadow("rgba(140, 255, 255, 0.35)", 48.0);
    list.push(DrawCommand::FillPath(vec![
        PathOp::MoveTo(-half_len, -half_thick),
        PathOp::LineTo(half_len, 0.0),
        PathOp::LineTo(-half_len, half_thick),
        PathOp::Close,
    ]));
    list.restore();
}

/// Drifting motes; positions depend only on index and time
fn draw_particles(list: &mut DisplayList, vp: Viewport, time_ms: f64, count: usize) {
    if count == 0 || vp.width <= 0.0 || vp.height <= 0.0 {
        return;
    }
    let n = count as f64;
    let (w, h) = (vp.width as f64, vp.height as f64);

    list.save();
    list.composite(Composite::Screen);
    for i in 0..count {
        let fi = i as f64;
        let drift = (time_ms / 1200.0 + fi).sin() * 120.0;
        let slot = |stride: u64| (i as u64 * stride % count as u64) as f64;
        let px = slot(97) * (w / n) + drift * 0.1;
        let py = slot(53) * (h / n) + (time_ms / 900.0 + px).sin() * 40.0;
        let size = 1.2 + (time_ms / 400.0 + fi).sin() * 0.8;
        list.fill_color("rgba(58, 255, 198, 0.16)");
        list.circle((px % w) as f32, (py % h) as f32, size as f32);
    }
    list.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};

    const VP: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn is_circle(c: &DrawCommand) -> bool {
        matches!(c, DrawCommand::FillCircle { .. })
    }

    fn is_path(c: &DrawCommand) -> bool {
        matches!(c, DrawCommand::FillPath(_))
    }

    fn scene_with_fruit(state: Lifecycle) -> SceneState {
        let mut scene = SceneState::new(21);
        scene.spawn_fruit(VP.width, VP.height);
        scene.fruits[0].state = state;
        scene.fruits[0].radius = 60.0;
        scene
    }

    #[test]
    fn test_empty_scene_layers() {
        let scene = SceneState::new(1);
        let list = render_scene(&scene, 0.0, VP, 28);
        assert!(matches!(list.commands[0], DrawCommand::ClearRect { .. }));
        assert!(matches!(list.commands[2], DrawCommand::FillRect { .. }));
        // Tray only; the blade is idle
        assert_eq!(list.count(is_path), 1);
        assert_eq!(list.count(is_circle), 28);
        assert_eq!(
            list.count(|c| *c == DrawCommand::SetComposite(Composite::Screen)),
            1
        );
    }

    #[test]
    fn test_layer_order() {
        let mut scene = SceneState::new(4);
        scene.spawn_fruit(VP.width, VP.height);
        scene.spawn_fruit(VP.width, VP.height);
        scene.fruits[0].pos = glam::Vec2::new(200.0, 250.0);
        scene.fruits[0].radius = 40.0;
        scene.fruits[1].pos = glam::Vec2::new(500.0, 260.0);
        scene.fruits[1].radius = 50.0;
        scene.blade.arm(glam::Vec2::new(330.0, 330.0), 40.0);
        let list = render_scene(&scene, 0.0, VP, 28);
        let cmds = &list.commands;

        let find = |from: usize, want: &DrawCommand| {
            cmds[from..]
                .iter()
                .position(|c| c == want)
                .map(|i| i + from)
                .expect("command present")
        };
        let paths: Vec<usize> = (0..cmds.len()).filter(|&i| is_path(&cmds[i])).collect();
        assert_eq!(paths.len(), 2);
        let (tray, wedge) = (paths[0], paths[1]);

        let first = find(0, &DrawCommand::Translate(200.0, 250.0));
        let first_disc = find(first, &DrawCommand::FillCircle { x: 0.0, y: 0.0, r: 40.0 });
        let second = find(first_disc, &DrawCommand::Translate(500.0, 260.0));
        let second_disc = find(second, &DrawCommand::FillCircle { x: 0.0, y: 0.0, r: 50.0 });
        assert!(tray < first);
        assert!(first_disc < second);
        assert!(second_disc < wedge);

        // Particles close the frame
        let screen = find(0, &DrawCommand::SetComposite(Composite::Screen));
        assert!(wedge < screen);
        let trailing = cmds[screen..].iter().filter(|c| is_circle(c)).count();
        assert_eq!(trailing, 28);
        assert_eq!(list.count(is_circle), 2 + 28);
    }

    #[test]
    fn test_whole_fruit_is_single_disc() {
        let scene = scene_with_fruit(Lifecycle::Enter);
        let list = render_scene(&scene, 0.0, VP, 0);
        assert_eq!(list.count(is_circle), 1);
        assert!(list.commands.contains(&DrawCommand::FillCircle {
            x: 0.0,
            y: 0.0,
            r: 60.0
        }));
    }

    #[test]
    fn test_cut_fruit_draws_two_halves_with_seeds() {
        let scene = scene_with_fruit(Lifecycle::Slice);
        let list = render_scene(&scene, 0.0, VP, 0);
        let seeds = seed_count(60.0);
        assert_eq!(seeds, 11);
        let ellipses = list.count(|c| matches!(c, DrawCommand::FillEllipse { .. }));
        // glow + 2 * (rind + flesh + seeds)
        assert_eq!(ellipses, 1 + 2 * (2 + seeds));
        assert_eq!(list.count(is_circle), 0);
    }

    #[test]
    fn test_settle_adds_pulse_ring() {
        let scene = scene_with_fruit(Lifecycle::Settle);
        let list = render_scene(&scene, 1234.0, VP, 0);
        assert_eq!(
            list.count(|c| *c == DrawCommand::SetComposite(Composite::Lighter)),
            1
        );
        assert_eq!(list.count(is_circle), 1);
    }

    #[test]
    fn test_exit_fruit_draws_whole() {
        let scene = scene_with_fruit(Lifecycle::Exit);
        let list = render_scene(&scene, 0.0, VP, 0);
        assert_eq!(list.count(is_circle), 1);
        assert_eq!(
            list.count(|c| *c == DrawCommand::SetComposite(Composite::Lighter)),
            0
        );
    }

    #[test]
    fn test_active_blade_draws_wedge() {
        let mut scene = SceneState::new(1);
        scene.blade.arm(glam::Vec2::new(200.0, 200.0), 50.0);
        let list = render_scene(&scene, 0.0, VP, 0);
        assert_eq!(list.count(is_path), 2);
    }

    #[test]
    fn test_save_restore_balanced() {
        let mut scene = SceneState::new(8);
        let mut input = TickInput::default();
        for _ in 0..600 {
            input.now_ms += 1000.0 / 60.0;
            tick(&mut scene, &input, 1.0 / 60.0);
        }
        let list = render_scene(&scene, input.now_ms, VP, 28);
        let saves = list.count(|c| *c == DrawCommand::Save);
        let restores = list.count(|c| *c == DrawCommand::Restore);
        assert_eq!(saves, restores);
    }

    #[test]
    fn test_render_is_pure() {
        let mut scene = SceneState::new(8);
        scene.spawn_fruit(VP.width, VP.height);
        let before = scene.fruits.clone();
        let a = render_scene(&scene, 500.0, VP, 28);
        let b = render_scene(&scene, 500.0, VP, 28);
        assert_eq!(a, b);
        assert_eq!(scene.fruits, before);
    }

    #[test]
    fn test_particles_stay_on_screen() {
        let scene = SceneState::new(1);
        for t in [0.0, 777.0, 123_456.0] {
            let list = render_scene(&scene, t, VP, 28);
            for c in &list.commands {
                if let DrawCommand::FillCircle { x, y, .. } = c {
                    assert!(*x > -VP.width && *x < VP.width);
                    assert!(*y > -VP.height && *y < VP.height);
                }
            }
        }
    }

    #[test]
    fn test_pulse_range() {
        for id in 0..50 {
            let p = pulse(id as f64 * 97.0, id);
            assert!((0.0..=1.0).contains(&p));
        }
    }
}
