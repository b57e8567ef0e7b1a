//! Offline shader backend: compiles WGSL with naga and checks stage
//! interfaces without a GPU. Used by tooling and tests.

use crate::shader::{LinkOutput, ShaderBackend, ShaderStage, StageOutput};
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Binding, BuiltIn, Handle, Module, Type, TypeInner};

/// A compiled stage. `module` is `None` when compilation failed.
#[derive(Debug)]
pub struct NagaStage {
    pub stage: ShaderStage,
    pub module: Option<Module>,
    pub entry_point: Option<String>,
}

/// A program produced by [`NagaBackend`]. Unlinked programs are still handed
/// back so callers see the same fail-open shape as on the GPU.
#[derive(Debug)]
pub struct NagaProgram {
    pub label: String,
    pub vertex_entry: Option<String>,
    pub fragment_entry: Option<String>,
    linked: bool,
}

impl NagaProgram {
    pub fn is_linked(&self) -> bool {
        self.linked
    }
}

#[derive(Debug, Default)]
pub struct NagaBackend;

impl NagaBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ShaderBackend for NagaBackend {
    type Stage = NagaStage;
    type Program = NagaProgram;

    fn compile_stage(
        &mut self,
        stage: ShaderStage,
        label: &str,
        source: &str,
    ) -> StageOutput<NagaStage> {
        match compile(stage, source) {
            Ok((module, entry_point)) => {
                tracing::debug!(%label, %entry_point, "naga compiled stage");
                StageOutput {
                    stage: NagaStage {
                        stage,
                        module: Some(module),
                        entry_point: Some(entry_point),
                    },
                    log: None,
                }
            }
            Err(log) => StageOutput {
                stage: NagaStage {
                    stage,
                    module: None,
                    entry_point: None,
                },
                log: Some(log),
            },
        }
    }

    fn link_program(
        &mut self,
        label: &str,
        vertex: &NagaStage,
        fragment: &NagaStage,
    ) -> LinkOutput<NagaProgram> {
        let log = link(vertex, fragment).err();
        LinkOutput {
            program: NagaProgram {
                label: label.to_string(),
                vertex_entry: vertex.entry_point.clone(),
                fragment_entry: fragment.entry_point.clone(),
                linked: log.is_none(),
            },
            log,
        }
    }
}

fn naga_stage(stage: ShaderStage) -> naga::ShaderStage {
    match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    }
}

fn compile(stage: ShaderStage, source: &str) -> Result<(Module, String), String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| e.emit_to_string(source))?;
    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == naga_stage(stage))
        .map(|ep| ep.name.clone())
        .ok_or_else(|| format!("no @{stage} entry point found"))?;
    Ok((module, entry_point))
}

/// Bound inputs or outputs of an entry point, flattened out of structs.
fn bindings(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<(Binding, TypeInner)>,
) {
    if let Some(binding) = binding {
        out.push((binding.clone(), module.types[ty].inner.clone()));
        return;
    }
    if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
        for member in members {
            if let Some(binding) = &member.binding {
                out.push((binding.clone(), module.types[member.ty].inner.clone()));
            }
        }
    }
}

fn location(binding: &Binding) -> Option<u32> {
    match binding {
        Binding::Location { location, .. } => Some(*location),
        Binding::BuiltIn(_) => None,
    }
}

fn link(vertex: &NagaStage, fragment: &NagaStage) -> Result<(), String> {
    let (Some(vs_module), Some(vs_entry)) = (&vertex.module, &vertex.entry_point) else {
        return Err("cannot link: vertex stage did not compile".into());
    };
    let (Some(fs_module), Some(fs_entry)) = (&fragment.module, &fragment.entry_point) else {
        return Err("cannot link: fragment stage did not compile".into());
    };

    let mut outputs = Vec::new();
    if let Some(ep) = vs_module.entry_points.iter().find(|ep| &ep.name == vs_entry) {
        if let Some(result) = &ep.function.result {
            bindings(vs_module, result.ty, result.binding.as_ref(), &mut outputs);
        }
    }
    let writes_position = outputs
        .iter()
        .any(|(b, _)| matches!(b, Binding::BuiltIn(BuiltIn::Position { .. })));
    if !writes_position {
        return Err(format!(
            "vertex entry point `{vs_entry}` does not write @builtin(position)"
        ));
    }

    let mut inputs = Vec::new();
    if let Some(ep) = fs_module.entry_points.iter().find(|ep| &ep.name == fs_entry) {
        for arg in &ep.function.arguments {
            bindings(fs_module, arg.ty, arg.binding.as_ref(), &mut inputs);
        }
    }

    let mut errors = Vec::new();
    for (binding, ty) in &inputs {
        let Some(loc) = location(binding) else {
            continue;
        };
        match outputs.iter().find(|(b, _)| location(b) == Some(loc)) {
            None => errors.push(format!(
                "fragment input @location({loc}) is not written by the vertex stage"
            )),
            Some((_, out_ty)) if out_ty != ty => errors.push(format!(
                "type mismatch at @location({loc}): vertex writes {out_ty:?}, fragment reads {ty:?}"
            )),
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("\n"))
    }
}
