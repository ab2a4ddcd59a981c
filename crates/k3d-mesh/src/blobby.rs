//! Blobby implicit surfaces.
//!
//! Each surface is a small expression tree. Its leaves are field
//! primitives (rows of the `vertex` table, each owning a run of `float`
//! rows) and its inner nodes are operators (rows of the `operator` table,
//! each owning a run of `operand` rows). Within a surface, nodes are
//! numbered leaves first, then operators, and operands name earlier nodes.

use k3d_array::{Array, Table, TypedArray};
use k3d_core::{MaterialRef, Matrix4};

use crate::error::{BuildError, ValidationError};
use crate::mesh::{Counts, Doubles, Indices, Materials, Mesh};
use crate::primitive::{GenericPrimitive, Primitives};
use crate::validation::*;

/// Kind tag of blobby surfaces.
pub const KIND: &str = "blobby";

/// Per-leaf field primitive type.
pub type PrimitiveTypes = TypedArray<i32>;
/// Per-operation operator code.
pub type OperatorCodes = TypedArray<i32>;

/// Leaf: a constant field, one float.
pub const CONSTANT: i32 = 1000;
/// Leaf: an ellipsoid, a column-major 4x4 transform.
pub const ELLIPSOID: i32 = 1001;
/// Leaf: a segment blob, two end points, a radius, and a 4x4 transform.
pub const SEGMENT: i32 = 1002;

/// Operator: sum of its operands (variadic).
pub const ADD: i32 = 0;
/// Operator: product of its operands (variadic).
pub const MULTIPLY: i32 = 1;
/// Operator: largest operand (variadic).
pub const MAXIMUM: i32 = 2;
/// Operator: smallest operand (variadic).
pub const MINIMUM: i32 = 3;
/// Operator: first operand minus the second.
pub const SUBTRACT: i32 = 4;
/// Operator: first operand divided by the second.
pub const DIVIDE: i32 = 5;
/// Operator: negated operand.
pub const NEGATE: i32 = 6;
/// Operator: the operand unchanged.
pub const IDENTITY: i32 = 7;

/// Read-only view of one blobby primitive.
#[derive(Clone, Copy, Debug)]
pub struct ConstPrimitive<'a> {
    /// Per-surface index of the first leaf.
    pub first_primitives: &'a Indices,
    /// Per-surface leaf count.
    pub primitive_counts: &'a Counts,
    /// Per-surface index of the first operation.
    pub first_operators: &'a Indices,
    /// Per-surface operation count.
    pub operator_counts: &'a Counts,
    /// Per-surface materials.
    pub materials: &'a Materials,
    /// Per-leaf field primitive type.
    pub primitives: &'a PrimitiveTypes,
    /// Per-leaf index of the first float.
    pub primitive_first_floats: &'a Indices,
    /// Per-leaf float count.
    pub primitive_float_counts: &'a Counts,
    /// Per-operation operator code.
    pub operators: &'a OperatorCodes,
    /// Per-operation index of the first operand.
    pub operator_first_operands: &'a Indices,
    /// Per-operation operand count.
    pub operator_operand_counts: &'a Counts,
    /// Concatenated leaf parameters.
    pub floats: &'a Doubles,
    /// Concatenated operation operands.
    pub operands: &'a Indices,
    /// Attributes shared by every surface.
    pub constant_attributes: &'a Table,
    /// Per-surface attributes.
    pub surface_attributes: &'a Table,
    /// Per-leaf varying attributes.
    pub parameter_attributes: &'a Table,
    /// Per-leaf vertex attributes.
    pub vertex_attributes: &'a Table,
}

/// Mutable view of one blobby primitive.
#[derive(Debug)]
pub struct Primitive<'a> {
    /// Per-surface index of the first leaf.
    pub first_primitives: &'a mut Indices,
    /// Per-surface leaf count.
    pub primitive_counts: &'a mut Counts,
    /// Per-surface index of the first operation.
    pub first_operators: &'a mut Indices,
    /// Per-surface operation count.
    pub operator_counts: &'a mut Counts,
    /// Per-surface materials.
    pub materials: &'a mut Materials,
    /// Per-leaf field primitive type.
    pub primitives: &'a mut PrimitiveTypes,
    /// Per-leaf index of the first float.
    pub primitive_first_floats: &'a mut Indices,
    /// Per-leaf float count.
    pub primitive_float_counts: &'a mut Counts,
    /// Per-operation operator code.
    pub operators: &'a mut OperatorCodes,
    /// Per-operation index of the first operand.
    pub operator_first_operands: &'a mut Indices,
    /// Per-operation operand count.
    pub operator_operand_counts: &'a mut Counts,
    /// Concatenated leaf parameters.
    pub floats: &'a mut Doubles,
    /// Concatenated operation operands.
    pub operands: &'a mut Indices,
    /// Attributes shared by every surface.
    pub constant_attributes: &'a mut Table,
    /// Per-surface attributes.
    pub surface_attributes: &'a mut Table,
    /// Per-leaf varying attributes.
    pub parameter_attributes: &'a mut Table,
    /// Per-leaf vertex attributes.
    pub vertex_attributes: &'a mut Table,
}

impl Primitive<'_> {
    /// Read-only view of the same storage.
    pub fn as_const(&self) -> ConstPrimitive<'_> {
        ConstPrimitive {
            first_primitives: self.first_primitives,
            primitive_counts: self.primitive_counts,
            first_operators: self.first_operators,
            operator_counts: self.operator_counts,
            materials: self.materials,
            primitives: self.primitives,
            primitive_first_floats: self.primitive_first_floats,
            primitive_float_counts: self.primitive_float_counts,
            operators: self.operators,
            operator_first_operands: self.operator_first_operands,
            operator_operand_counts: self.operator_operand_counts,
            floats: self.floats,
            operands: self.operands,
            constant_attributes: self.constant_attributes,
            surface_attributes: self.surface_attributes,
            parameter_attributes: self.parameter_attributes,
            vertex_attributes: self.vertex_attributes,
        }
    }
}

impl<'a> ConstPrimitive<'a> {
    /// The structure arrays, by stored name.
    pub fn structure_arrays(&self) -> Vec<(&'static str, &'a dyn Array)> {
        vec![
            ("first_primitives", self.first_primitives as &'a dyn Array),
            ("primitive_counts", self.primitive_counts as &'a dyn Array),
            ("first_operators", self.first_operators as &'a dyn Array),
            ("operator_counts", self.operator_counts as &'a dyn Array),
            ("materials", self.materials as &'a dyn Array),
            ("primitives", self.primitives as &'a dyn Array),
            ("primitive_first_floats", self.primitive_first_floats as &'a dyn Array),
            ("primitive_float_counts", self.primitive_float_counts as &'a dyn Array),
            ("operators", self.operators as &'a dyn Array),
            ("operator_first_operands", self.operator_first_operands as &'a dyn Array),
            ("operator_operand_counts", self.operator_operand_counts as &'a dyn Array),
            ("floats", self.floats as &'a dyn Array),
            ("operands", self.operands as &'a dyn Array),
        ]
    }

    /// Number of surfaces.
    pub fn surface_count(&self) -> usize {
        self.first_primitives.len()
    }

    /// Parameters of leaf `leaf`.
    pub fn leaf_floats(&self, leaf: usize) -> &'a [f64] {
        let first = self.primitive_first_floats[leaf] as usize;
        let count = self.primitive_float_counts[leaf] as usize;
        &self.floats.as_slice()[first..first + count]
    }

    /// Operands of operation `operation`.
    pub fn operation_operands(&self, operation: usize) -> &'a [u64] {
        let first = self.operator_first_operands[operation] as usize;
        let count = self.operator_operand_counts[operation] as usize;
        &self.operands.as_slice()[first..first + count]
    }
}

/// Append an empty blobby primitive to `primitives`.
pub fn create_in(primitives: &mut Primitives) -> Primitive<'_> {
    let generic = primitives.create(KIND);
    let surface = generic.structure.create("surface");
    surface.create::<Indices>("first_primitives");
    surface.create::<Counts>("primitive_counts");
    surface.create::<Indices>("first_operators");
    surface.create::<Counts>("operator_counts");
    surface.create::<Materials>("materials");
    let vertex = generic.structure.create("vertex");
    vertex.create::<PrimitiveTypes>("primitives");
    vertex.create::<Indices>("primitive_first_floats");
    vertex.create::<Counts>("primitive_float_counts");
    let operator = generic.structure.create("operator");
    operator.create::<OperatorCodes>("operators");
    operator.create::<Indices>("operator_first_operands");
    operator.create::<Counts>("operator_operand_counts");
    generic.structure.create("float").create::<Doubles>("floats");
    generic.structure.create("operand").create::<Indices>("operands");
    for name in ["constant", "surface", "parameter", "vertex"] {
        generic.attributes.create(name);
    }
    bind_mut(generic).expect("freshly created blobby is well-formed")
}

/// Validate a generic primitive as blobby surfaces, reporting the first
/// problem found.
///
/// Every surface's leaf and operation runs, every leaf's floats, and every
/// operation's operands must lie inside their tables.
pub fn try_validate<'a>(
    mesh: &Mesh,
    primitive: &'a GenericPrimitive,
) -> Result<ConstPrimitive<'a>, ValidationError> {
    require_kind(primitive, KIND)?;
    require_valid_primitive(mesh, primitive)?;

    let surface = require_structure(primitive, "surface")?;
    let vertex = require_structure(primitive, "vertex")?;
    let operator = require_structure(primitive, "operator")?;
    let float = require_structure(primitive, "float")?;
    let operand = require_structure(primitive, "operand")?;

    let constant_attributes = require_attributes(primitive, "constant")?;
    let surface_attributes = require_attributes(primitive, "surface")?;
    let parameter_attributes = require_attributes(primitive, "parameter")?;
    let vertex_attributes = require_attributes(primitive, "vertex")?;

    let first_primitives = require_array::<Indices>(surface, "surface", "first_primitives")?;
    let primitive_counts = require_array::<Counts>(surface, "surface", "primitive_counts")?;
    let first_operators = require_array::<Indices>(surface, "surface", "first_operators")?;
    let operator_counts = require_array::<Counts>(surface, "surface", "operator_counts")?;
    let materials = require_array::<Materials>(surface, "surface", "materials")?;
    let primitives = require_array::<PrimitiveTypes>(vertex, "vertex", "primitives")?;
    let primitive_first_floats = require_array::<Indices>(vertex, "vertex", "primitive_first_floats")?;
    let primitive_float_counts = require_array::<Counts>(vertex, "vertex", "primitive_float_counts")?;
    let operators = require_array::<OperatorCodes>(operator, "operator", "operators")?;
    let operator_first_operands =
        require_array::<Indices>(operator, "operator", "operator_first_operands")?;
    let operator_operand_counts =
        require_array::<Counts>(operator, "operator", "operator_operand_counts")?;
    let floats = require_array::<Doubles>(float, "float", "floats")?;
    let operands = require_array::<Indices>(operand, "operand", "operands")?;

    require_table_row_count(surface_attributes, "surface", surface.row_count())?;
    require_table_row_count(parameter_attributes, "parameter", vertex.row_count())?;
    require_table_row_count(vertex_attributes, "vertex", vertex.row_count())?;

    require_ranges(first_primitives, primitive_counts, "first_primitives", primitives.len())?;
    require_ranges(first_operators, operator_counts, "first_operators", operators.len())?;
    require_ranges(
        primitive_first_floats,
        primitive_float_counts,
        "primitive_first_floats",
        floats.len(),
    )?;
    require_ranges(
        operator_first_operands,
        operator_operand_counts,
        "operator_first_operands",
        operands.len(),
    )?;

    Ok(ConstPrimitive {
        first_primitives,
        primitive_counts,
        first_operators,
        operator_counts,
        materials,
        primitives,
        primitive_first_floats,
        primitive_float_counts,
        operators,
        operator_first_operands,
        operator_operand_counts,
        floats,
        operands,
        constant_attributes,
        surface_attributes,
        parameter_attributes,
        vertex_attributes,
    })
}

fn bind_mut(primitive: &mut GenericPrimitive) -> Option<Primitive<'_>> {
    let GenericPrimitive {
        structure,
        attributes,
        ..
    } = primitive;
    let [surface, vertex, operator, float, operand] =
        structure.tables_mut(["surface", "vertex", "operator", "float", "operand"])?;
    let [first_primitives, primitive_counts, first_operators, operator_counts, materials] = surface
        .writable_many([
            "first_primitives",
            "primitive_counts",
            "first_operators",
            "operator_counts",
            "materials",
        ])?;
    let [primitives, primitive_first_floats, primitive_float_counts] = vertex.writable_many([
        "primitives",
        "primitive_first_floats",
        "primitive_float_counts",
    ])?;
    let [operators, operator_first_operands, operator_operand_counts] = operator.writable_many([
        "operators",
        "operator_first_operands",
        "operator_operand_counts",
    ])?;
    let [constant_attributes, surface_attributes, parameter_attributes, vertex_attributes] =
        attributes.tables_mut(["constant", "surface", "parameter", "vertex"])?;
    Some(Primitive {
        first_primitives: first_primitives.downcast_mut::<Indices>()?,
        primitive_counts: primitive_counts.downcast_mut::<Counts>()?,
        first_operators: first_operators.downcast_mut::<Indices>()?,
        operator_counts: operator_counts.downcast_mut::<Counts>()?,
        materials: materials.downcast_mut::<Materials>()?,
        primitives: primitives.downcast_mut::<PrimitiveTypes>()?,
        primitive_first_floats: primitive_first_floats.downcast_mut::<Indices>()?,
        primitive_float_counts: primitive_float_counts.downcast_mut::<Counts>()?,
        operators: operators.downcast_mut::<OperatorCodes>()?,
        operator_first_operands: operator_first_operands.downcast_mut::<Indices>()?,
        operator_operand_counts: operator_operand_counts.downcast_mut::<Counts>()?,
        floats: float.writable_as::<Doubles>("floats")?,
        operands: operand.writable_as::<Indices>("operands")?,
        constant_attributes,
        surface_attributes,
        parameter_attributes,
        vertex_attributes,
    })
}

crate::kind::primitive_kind!();

/// A field primitive of a blobby surface.
#[derive(Clone, Copy, Debug)]
pub struct Leaf<'a> {
    /// [`CONSTANT`], [`ELLIPSOID`], or [`SEGMENT`].
    pub primitive_type: i32,
    /// The leaf's parameters.
    pub floats: &'a [f64],
}

/// An operator node of a blobby surface.
#[derive(Clone, Copy, Debug)]
pub struct Operation<'a> {
    /// Operator code, [`ADD`] through [`IDENTITY`].
    pub operator: i32,
    /// Node indices. Variadic operators take their node count first.
    pub operands: &'a [u64],
}

fn leaf_float_count(primitive_type: i32) -> Option<usize> {
    match primitive_type {
        CONSTANT => Some(1),
        ELLIPSOID => Some(16),
        SEGMENT => Some(23),
        _ => None,
    }
}

/// The node operands of `operation`, with any count prefix removed.
fn operation_nodes<'o>(index: usize, operation: &Operation<'o>) -> Result<&'o [u64], BuildError> {
    let operands = operation.operands;
    let nodes = match operation.operator {
        ADD | MULTIPLY | MAXIMUM | MINIMUM => match operands.split_first() {
            Some((&count, nodes)) if !nodes.is_empty() && count == nodes.len() as u64 => {
                Some(nodes)
            }
            _ => None,
        },
        SUBTRACT | DIVIDE => (operands.len() == 2).then_some(operands),
        NEGATE | IDENTITY => (operands.len() == 1).then_some(operands),
        _ => None,
    };
    nodes.ok_or(BuildError::InvalidOperation {
        operation: index,
        operator: operation.operator,
        operands: operands.len(),
    })
}

/// Append one surface built from `leaves` and `operations`.
///
/// Operation `i` may only name leaves and operations `0 .. i` of the same
/// surface, so the last operation (or the single leaf) is the root. Surface
/// and per-leaf attribute tables are resized to the new row counts. The
/// primitive is unchanged on error.
pub fn add_surface(
    primitive: &mut Primitive<'_>,
    leaves: &[Leaf<'_>],
    operations: &[Operation<'_>],
    material: MaterialRef,
) -> Result<(), BuildError> {
    for (index, leaf) in leaves.iter().enumerate() {
        if leaf_float_count(leaf.primitive_type) != Some(leaf.floats.len()) {
            return Err(BuildError::InvalidLeaf {
                leaf: index,
                primitive_type: leaf.primitive_type,
                floats: leaf.floats.len(),
            });
        }
    }
    for (index, operation) in operations.iter().enumerate() {
        let node_count = leaves.len() + index;
        let nodes = operation_nodes(index, operation)?;
        if let Some(&operand) = nodes.iter().find(|&&node| node as usize >= node_count) {
            return Err(BuildError::InvalidOperand {
                operation: index,
                operand,
                node_count,
            });
        }
    }

    primitive.first_primitives.push(primitive.primitives.len() as u64);
    primitive.primitive_counts.push(leaves.len() as u64);
    primitive.first_operators.push(primitive.operators.len() as u64);
    primitive.operator_counts.push(operations.len() as u64);
    primitive.materials.push(material);
    for leaf in leaves {
        primitive.primitives.push(leaf.primitive_type);
        primitive.primitive_first_floats.push(primitive.floats.len() as u64);
        primitive.primitive_float_counts.push(leaf.floats.len() as u64);
        primitive.floats.extend_from_slice(leaf.floats);
    }
    for operation in operations {
        primitive.operators.push(operation.operator);
        primitive.operator_first_operands.push(primitive.operands.len() as u64);
        primitive.operator_operand_counts.push(operation.operands.len() as u64);
        primitive.operands.extend_from_slice(operation.operands);
    }

    let surfaces = primitive.first_primitives.len();
    let leaf_rows = primitive.primitives.len();
    primitive.surface_attributes.set_row_count(surfaces);
    primitive.parameter_attributes.set_row_count(leaf_rows);
    primitive.vertex_attributes.set_row_count(leaf_rows);
    Ok(())
}

/// Append a surface holding a single ellipsoid, the unit sphere under
/// `matrix`.
pub fn add_ellipsoid(
    primitive: &mut Primitive<'_>,
    matrix: &Matrix4,
    material: MaterialRef,
) -> Result<(), BuildError> {
    let floats: Vec<f64> = (0..4)
        .flat_map(|column| matrix.0.iter().map(move |row| row[column]))
        .collect();
    let leaf = Leaf {
        primitive_type: ELLIPSOID,
        floats: &floats,
    };
    add_surface(primitive, &[leaf], &[], material)
}
