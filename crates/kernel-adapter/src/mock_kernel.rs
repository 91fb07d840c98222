//! MockKernel — deterministic test double implementing Kernel.
//!
//! Solids are recorded as a placed primitive plus the ordered list of tools
//! subtracted from it, so tests can compare build results structurally.
//! Every call is logged and any call can be made to fail by its ordinal.

use crate::traits::{check_dimensions, Kernel};
use crate::types::*;
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

/// A primitive shape as created by the kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockPrimitive {
    Box { dims: [f64; 3] },
    Cylinder { radius: f64, height: f64 },
    Sphere { radius: f64 },
}

impl MockPrimitive {
    /// Local-space bounds before placement.
    fn bounds(&self) -> ([f64; 3], [f64; 3]) {
        match *self {
            MockPrimitive::Box { dims } => ([0.0; 3], dims),
            MockPrimitive::Cylinder { radius, height } => {
                ([-radius, -radius, 0.0], [radius, radius, height])
            }
            MockPrimitive::Sphere { radius } => ([-radius; 3], [radius; 3]),
        }
    }
}

/// A primitive placed at an offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockPlaced {
    pub primitive: MockPrimitive,
    pub offset: [f64; 3],
}

impl MockPlaced {
    /// World-space axis-aligned bounds.
    pub fn bounds(&self) -> ([f64; 3], [f64; 3]) {
        let (min, max) = self.primitive.bounds();
        (add(min, self.offset), add(max, self.offset))
    }
}

/// A synthetic solid: a base primitive minus a sequence of tools.
#[derive(Debug, Clone, PartialEq)]
pub struct MockSolid {
    pub base: MockPlaced,
    pub cuts: Vec<MockPlaced>,
}

/// One logged kernel call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    CreateBox { dims: [f64; 3] },
    CreateCylinder { radius: f64, height: f64 },
    CreateSphere { radius: f64 },
    Translate { solid: u64, offset: [f64; 3] },
    Subtract { a: u64, b: u64 },
    ExportStep { solid: u64 },
    Tessellate { solid: u64 },
    Release { solid: u64 },
}

/// Which call ordinals (0-based, per operation) should fail.
#[derive(Debug, Default)]
struct FailurePlan {
    primitive: HashSet<usize>,
    translate: HashSet<usize>,
    subtract: HashSet<usize>,
    export: bool,
    tessellate: bool,
}

/// Deterministic test double for the geometry kernel.
pub struct MockKernel {
    next_handle: u64,
    solids: HashMap<u64, MockSolid>,
    calls: Vec<MockCall>,
    failures: FailurePlan,
    primitive_calls: usize,
    translate_calls: usize,
    subtract_calls: usize,
    unknown_releases: usize,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
            calls: Vec::new(),
            failures: FailurePlan::default(),
            primitive_calls: 0,
            translate_calls: 0,
            subtract_calls: 0,
            unknown_releases: 0,
        }
    }

    /// Make the n-th primitive creation (box, cylinder or sphere) fail.
    pub fn fail_primitive_call(&mut self, ordinal: usize) -> &mut Self {
        self.failures.primitive.insert(ordinal);
        self
    }

    /// Make the n-th translate call fail.
    pub fn fail_translate_call(&mut self, ordinal: usize) -> &mut Self {
        self.failures.translate.insert(ordinal);
        self
    }

    /// Make the n-th boolean subtraction fail.
    pub fn fail_subtract_call(&mut self, ordinal: usize) -> &mut Self {
        self.failures.subtract.insert(ordinal);
        self
    }

    /// Make every STEP export fail.
    pub fn fail_export(&mut self) -> &mut Self {
        self.failures.export = true;
        self
    }

    /// Make every tessellation fail.
    pub fn fail_tessellate(&mut self) -> &mut Self {
        self.failures.tessellate = true;
        self
    }

    /// The synthetic solid behind a handle.
    pub fn solid(&self, handle: &KernelSolidHandle) -> Option<&MockSolid> {
        self.solids.get(&handle.id())
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    /// Number of logged calls matching a predicate.
    pub fn count_calls(&self, pred: impl Fn(&MockCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Releases of handles the kernel did not know about.
    pub fn unknown_releases(&self) -> usize {
        self.unknown_releases
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn store(&mut self, solid: MockSolid) -> KernelSolidHandle {
        let handle = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        self.solids.insert(handle.id(), solid);
        handle
    }

    fn lookup(
        &self,
        operation: &'static str,
        handle: &KernelSolidHandle,
    ) -> Result<&MockSolid, KernelError> {
        self.solids
            .get(&handle.id())
            .ok_or_else(|| KernelError::not_found(operation, handle))
    }

    fn create_primitive(
        &mut self,
        operation: &'static str,
        primitive: MockPrimitive,
    ) -> Result<KernelSolidHandle, KernelError> {
        let ordinal = self.primitive_calls;
        self.primitive_calls += 1;
        if self.failures.primitive.contains(&ordinal) {
            return Err(KernelError::PrimitiveFailed {
                operation,
                reason: format!("injected failure on primitive call {}", ordinal),
            });
        }
        Ok(self.store(MockSolid {
            base: MockPlaced {
                primitive,
                offset: [0.0; 3],
            },
            cuts: Vec::new(),
        }))
    }

    /// Deterministic box mesh: 2 triangles per face, 6 faces, from the base bounds.
    fn tessellate_bounds(min: [f64; 3], max: [f64; 3]) -> RenderMesh {
        let corner = |i: usize| -> [f64; 3] {
            [
                if i & 1 == 0 { min[0] } else { max[0] },
                if i & 2 == 0 { min[1] } else { max[1] },
                if i & 4 == 0 { min[2] } else { max[2] },
            ]
        };
        // (corner indices counter-clockwise seen from outside, outward normal)
        let faces: [([usize; 4], [f32; 3]); 6] = [
            ([0, 2, 3, 1], [0.0, 0.0, -1.0]),
            ([4, 5, 7, 6], [0.0, 0.0, 1.0]),
            ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
            ([2, 6, 7, 3], [0.0, 1.0, 0.0]),
            ([0, 4, 6, 2], [-1.0, 0.0, 0.0]),
            ([1, 3, 7, 5], [1.0, 0.0, 0.0]),
        ];

        let mut mesh = RenderMesh::default();
        for (face_index, (quad, normal)) in faces.iter().enumerate() {
            let start_index = mesh.indices.len() as u32;
            let base = (mesh.vertices.len() / 3) as u32;
            for &c in quad {
                let p = corner(c);
                mesh.vertices
                    .extend_from_slice(&[p[0] as f32, p[1] as f32, p[2] as f32]);
                mesh.normals.extend_from_slice(normal);
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
            mesh.face_ranges.push(FaceRange {
                face_index: face_index as u32,
                start_index,
                end_index: mesh.indices.len() as u32,
            });
        }
        mesh
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn write_placed(out: &mut String, id: usize, label: &str, placed: &MockPlaced) {
    let (min, max) = placed.bounds();
    let _ = writeln!(
        out,
        "#{}=BLOCK('{}',({:.4},{:.4},{:.4}),({:.4},{:.4},{:.4}));",
        id, label, min[0], min[1], min[2], max[0], max[1], max[2]
    );
}

impl Kernel for MockKernel {
    fn create_box(&mut self, dims: [f64; 3]) -> Result<KernelSolidHandle, KernelError> {
        self.calls.push(MockCall::CreateBox { dims });
        check_dimensions("create_box", &dims)?;
        self.create_primitive("create_box", MockPrimitive::Box { dims })
    }

    fn create_cylinder(
        &mut self,
        radius: f64,
        height: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.calls.push(MockCall::CreateCylinder { radius, height });
        check_dimensions("create_cylinder", &[radius, height])?;
        self.create_primitive("create_cylinder", MockPrimitive::Cylinder { radius, height })
    }

    fn create_sphere(&mut self, radius: f64) -> Result<KernelSolidHandle, KernelError> {
        self.calls.push(MockCall::CreateSphere { radius });
        check_dimensions("create_sphere", &[radius])?;
        self.create_primitive("create_sphere", MockPrimitive::Sphere { radius })
    }

    fn translate(
        &mut self,
        solid: &KernelSolidHandle,
        offset: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        self.calls.push(MockCall::Translate {
            solid: solid.id(),
            offset,
        });
        let ordinal = self.translate_calls;
        self.translate_calls += 1;
        if self.failures.translate.contains(&ordinal) {
            return Err(KernelError::TransformFailed {
                reason: format!("injected failure on translate call {}", ordinal),
            });
        }

        let mut moved = self.lookup("translate", solid)?.clone();
        moved.base.offset = add(moved.base.offset, offset);
        for cut in &mut moved.cuts {
            cut.offset = add(cut.offset, offset);
        }
        Ok(self.store(moved))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.calls.push(MockCall::Subtract {
            a: a.id(),
            b: b.id(),
        });
        let ordinal = self.subtract_calls;
        self.subtract_calls += 1;

        let mut result = self.lookup("boolean_subtract", a)?.clone();
        let tool = self.lookup("boolean_subtract", b)?.base;
        if self.failures.subtract.contains(&ordinal) {
            return Err(KernelError::BooleanFailed {
                reason: format!("injected failure on subtract call {}", ordinal),
            });
        }

        result.cuts.push(tool);
        Ok(self.store(result))
    }

    fn export_step(&mut self, solid: &KernelSolidHandle) -> Result<Vec<u8>, KernelError> {
        self.calls.push(MockCall::ExportStep { solid: solid.id() });
        let mock = self.lookup("export_step", solid)?;
        if self.failures.export {
            return Err(KernelError::ExportFailed {
                reason: "injected export failure".to_string(),
            });
        }

        let mut out = String::new();
        out.push_str("ISO-10303-21;\nHEADER;\n");
        out.push_str("FILE_DESCRIPTION(('mock solid'),'2;1');\n");
        out.push_str("FILE_SCHEMA(('CONFIG_CONTROL_DESIGN'));\nENDSEC;\nDATA;\n");
        write_placed(&mut out, 1, "base", &mock.base);
        for (i, cut) in mock.cuts.iter().enumerate() {
            write_placed(&mut out, i + 2, "cut", cut);
        }
        out.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
        Ok(out.into_bytes())
    }

    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        self.calls.push(MockCall::Tessellate { solid: solid.id() });
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(KernelError::TessellationFailed {
                reason: format!("tolerance must be positive, got {}", tolerance),
            });
        }
        let (min, max) = self.lookup("tessellate", solid)?.base.bounds();
        if self.failures.tessellate {
            return Err(KernelError::TessellationFailed {
                reason: "injected tessellation failure".to_string(),
            });
        }
        Ok(Self::tessellate_bounds(min, max))
    }

    fn release(&mut self, solid: KernelSolidHandle) {
        self.calls.push(MockCall::Release { solid: solid.id() });
        if self.solids.remove(&solid.id()).is_none() {
            self.unknown_releases += 1;
        }
    }

    fn live_handles(&self) -> usize {
        self.solids.len()
    }
}
