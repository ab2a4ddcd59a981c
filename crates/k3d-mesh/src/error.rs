//! Error types for primitive validation and construction.

/// Why a generic primitive failed to validate as a particular kind.
///
/// Validation is a probing operation, so these are normally logged and
/// turned into `None` by the per-kind `validate` functions; `try_validate`
/// returns them directly.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The primitive's kind tag names another kind.
    #[error("expected a {expected} primitive, found {found}")]
    WrongKind {
        /// Kind being validated.
        expected: String,
        /// Kind tag of the primitive.
        found: String,
    },
    /// A required structure table is absent.
    #[error("missing structure table [{table}]")]
    MissingStructure {
        /// Table name.
        table: String,
    },
    /// A required attribute table is absent.
    #[error("missing attribute table [{table}]")]
    MissingAttributes {
        /// Table name.
        table: String,
    },
    /// A required array is absent from its table.
    #[error("missing array [{array}] in table [{table}]")]
    MissingArray {
        /// Table name.
        table: String,
        /// Array name.
        array: String,
    },
    /// A required array has the wrong concrete type.
    #[error("array [{array}] has type {found}, expected {expected}")]
    WrongArrayType {
        /// Array name.
        array: String,
        /// Required type string.
        expected: String,
        /// Actual type string.
        found: String,
    },
    /// A required metadata value is absent or different.
    #[error("array [{array}] missing metadata {key}={value}")]
    MissingMetadata {
        /// Array name.
        array: String,
        /// Metadata key.
        key: String,
        /// Required metadata value.
        value: String,
    },
    /// A table does not have the number of rows implied by other arrays.
    #[error("table [{table}] has {found} rows, expected {expected}")]
    RowCountMismatch {
        /// Table name.
        table: String,
        /// Implied row count.
        expected: usize,
        /// Actual row count.
        found: usize,
    },
    /// The values of a count array sum past the addressable range.
    #[error("counts in array [{array}] overflow")]
    CountOverflow {
        /// Array name.
        array: String,
    },
    /// Arrays of the same table differ in length.
    #[error("array [{array}] in table [{table}] has length {found}, expected {expected}")]
    InconsistentTable {
        /// Table name.
        table: String,
        /// First array whose length differs.
        array: String,
        /// Row count of the table.
        expected: usize,
        /// Length of the array.
        found: usize,
    },
    /// A point-index array refers past the end of the mesh points.
    #[error("array [{array}] index {index} out of bounds for {point_count} points")]
    PointIndexOutOfBounds {
        /// Array name.
        array: String,
        /// Offending index.
        index: u64,
        /// Number of mesh points.
        point_count: usize,
    },
    /// An index array refers past the end of the structure it indexes.
    #[error("array [{array}] index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Array name.
        array: String,
        /// Offending index.
        index: u64,
        /// Length of the indexed structure.
        len: usize,
    },
    /// Following clockwise edges from a loop's first edge never returns.
    #[error("infinite loop at loop index {loop_index}")]
    InfiniteLoop {
        /// Index of the loop.
        loop_index: usize,
    },
}

/// Why a construction helper refused its input.
///
/// Construction helpers check everything before modifying the mesh, so an
/// error leaves the mesh unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// A face has fewer than three vertices.
    #[error("face {face} has {count} vertices, at least three are required")]
    TooFewVertices {
        /// Face index.
        face: usize,
        /// Vertex count of the face.
        count: u64,
    },
    /// The number of indices does not match the sum of the counts.
    #[error("expected {expected} indices, received {found}")]
    IndexCountMismatch {
        /// Sum of the counts.
        expected: usize,
        /// Number of indices supplied.
        found: usize,
    },
    /// An index refers past the end of the supplied vertices.
    #[error("index {index} out of bounds for {len} vertices")]
    VertexOutOfBounds {
        /// Offending index.
        index: u64,
        /// Number of vertices.
        len: usize,
    },
    /// A shell index refers past the end of the shell list.
    #[error("shell {shell} out of bounds for {shell_count} shells")]
    InvalidShell {
        /// Offending shell index.
        shell: usize,
        /// Number of shells.
        shell_count: usize,
    },
    /// A curve order is below two.
    #[error("curve order {order} is below two")]
    InvalidOrder {
        /// Offending order.
        order: u64,
    },
    /// A curve has fewer control points than its order (or than two).
    #[error("curve with {count} control points is too short for order {order}")]
    TooFewControlPoints {
        /// Curve order.
        order: u64,
        /// Number of control points.
        count: usize,
    },
    /// A fixed-size primitive received the wrong number of control points.
    #[error("expected {expected} control points, received {found}")]
    ControlPointCountMismatch {
        /// Control points per primitive.
        expected: usize,
        /// Number of control points supplied.
        found: usize,
    },
    /// A blobby leaf has an unknown type or the wrong number of floats.
    #[error("leaf {leaf} of type {primitive_type} cannot take {floats} floats")]
    InvalidLeaf {
        /// Leaf index within its surface.
        leaf: usize,
        /// Leaf primitive type.
        primitive_type: i32,
        /// Number of floats supplied.
        floats: usize,
    },
    /// A blobby operation has an unknown operator or the wrong operand count.
    #[error("operation {operation} with operator {operator} cannot take {operands} operands")]
    InvalidOperation {
        /// Operation index within its surface.
        operation: usize,
        /// Operator code.
        operator: i32,
        /// Number of operands supplied.
        operands: usize,
    },
    /// A blobby operand names a node that does not precede its operation.
    #[error("operation {operation} refers to node {operand}, only {node_count} precede it")]
    InvalidOperand {
        /// Operation index within its surface.
        operation: usize,
        /// Offending node index.
        operand: u64,
        /// Number of nodes before the operation.
        node_count: usize,
    },
    /// The number of weights does not match the number of control points.
    #[error("{weights} weights given for {points} control points")]
    WeightCountMismatch {
        /// Number of control points.
        points: usize,
        /// Number of weights.
        weights: usize,
    },
    /// The knot vector has the wrong length.
    #[error("expected {expected} knots, received {found}")]
    KnotCountMismatch {
        /// Required number of knots.
        expected: usize,
        /// Number of knots supplied.
        found: usize,
    },
}
