/// Number of SIMD lanes, one fragment of a 2x2 quad per lane.
pub const LANE_COUNT: usize = 4;

/// Number of logical shader registers. Each register holds four components
/// (x, y, z, w) and occupies four consecutive vector slots in the processor.
pub const SHADER_REGISTER_COUNT: usize = 64;

/// Maximum nesting depth of `If`/`EndIf` scopes in a single program.
/// Exceeding it is a compiler bug, not a runtime condition.
pub const SHADER_STACK_DEPTH: usize = 16;

/// Number of sampler binding slots visible to a program.
pub const SHADER_SAMPLER_COUNT: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Exit,
    Discard,
    Mov,
    Add,
    Sub,
    Mul,
    Div,
    Dot,
    Sqrt,
    CmpLt,
    CmpGt,
    CmpLte,
    CmpGte,
    CmpEq,
    CmpNeq,
    Ddx,
    Ddy,
    Texture2D,
    Texture2DLod,
    If,
    Else,
    EndIf,
}

/// A single fixed-width shader instruction.
///
/// `arg2` doubles as the forward skip count for `If` and `Else`: the distance
/// to the matching `Else`/`EndIf`, taken when no lane enters the branch.
#[derive(Clone, Copy, Debug)]
pub struct Instruction {
    pub op: Opcode,
    pub dst: u8,
    pub arg1: u8,
    pub arg2: u8,
}

impl Instruction {
    pub const fn new(op: Opcode, dst: u8, arg1: u8, arg2: u8) -> Self {
        Self { op, dst, arg1, arg2 }
    }
}

/// An immutable shader program: an ordered instruction sequence plus an entry
/// point.
///
/// Programs come from an external compiler and are consumed read-only. The
/// processor does not validate them; unbalanced scopes, out of range register
/// indices or skip counts pointing outside the program are compiler bugs with
/// undefined behavior at execution time.
#[derive(Clone, Debug)]
pub struct Shader {
    instructions: Box<[Instruction]>,
    entry_point: usize,
}

impl Shader {
    pub fn new(instructions: impl Into<Box<[Instruction]>>, entry_point: usize) -> Self {
        Self {
            instructions: instructions.into(),
            entry_point,
        }
    }

    pub fn entry_point(&self) -> usize {
        self.entry_point
    }

    pub fn num_instructions(&self) -> usize {
        self.instructions.len()
    }

    pub fn instruction_at(&self, position: usize) -> Instruction {
        self.instructions[position]
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}
