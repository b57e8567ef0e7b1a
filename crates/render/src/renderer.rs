use glam::Vec3;
use spincube_scene::Scene;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and produces output for one frame. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render `scene` as frame number `frame`.
    fn render(&self, scene: &Scene, frame: u64) -> Self::Output;
}

/// Text renderer for headless runs and logs.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn fmt_vec(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, frame: u64) -> String {
        let cube = scene.cube.transform();
        let cam = &scene.camera;
        let mut out = format!("=== frame {frame} ===\n");
        out.push_str(&format!(
            "cube:   pos={} rot={} scale={}\n",
            fmt_vec(cube.position),
            fmt_vec(cube.orientation()),
            fmt_vec(cube.scale)
        ));
        out.push_str(&format!(
            "camera: pos={} rot={} forward={}\n",
            fmt_vec(cam.position()),
            fmt_vec(cam.orientation()),
            fmt_vec(cam.forward())
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scene_text() {
        let output = DebugTextRenderer::new().render(&Scene::demo(), 0);
        assert!(output.starts_with("=== frame 0 ==="));
        assert!(output.contains("cube:   pos=(3.00, 0.00, 0.25)"));
        assert!(output.contains("scale=(0.25, 0.25, 0.25)"));
        assert!(output.contains("camera: pos=(0.00, 0.00, 1.00)"));
        assert!(output.contains("forward=(1.00, 0.00, 0.00)"));
    }

    #[test]
    fn reflects_cube_spin() {
        let mut scene = Scene::demo();
        scene.advance(Vec3::ZERO, Vec3::ZERO, 2.0);
        let output = DebugTextRenderer::new().render(&scene, 1);
        assert!(output.contains("rot=(0.00, 20.00, 0.00)"));
    }
}
