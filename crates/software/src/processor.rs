use crate::{
    math::{ddx, ddy},
    sampler::Sampler,
    simd::{Vec2, Vec4, f32x4, i32x4},
};
use softshade_core::{
    Instruction, Opcode, SHADER_REGISTER_COUNT, SHADER_SAMPLER_COUNT, SHADER_STACK_DEPTH, Shader,
};

const COMPONENT_SLOTS: usize = SHADER_REGISTER_COUNT * 4;

/// Executes a [`Shader`] across the four lanes of a fragment quad.
///
/// The processor owns its register file, write mask and mask stack; the
/// instruction pointer and stack are reset at the start of every execution.
/// Register contents persist between executions only in the sense that the
/// caller preloads inputs (interpolated attributes) and reads outputs back
/// afterwards. A processor must not be shared between threads; parallel
/// rasterizers run one processor per worker and share only samplers and
/// textures, which stay read-only during execution.
///
/// Programs are trusted: register indices, skip counts and scope balance are
/// not validated per instruction. The only runtime checks are the bounds
/// asserts inherent to safe indexing and the mask stack depth assert.
pub struct ShaderProcessor {
    instruction_pointer: usize,
    stack_pointer: usize,
    write_mask: i32x4,
    write_mask_stack: [i32x4; SHADER_STACK_DEPTH],
    registers: [f32x4; COMPONENT_SLOTS],
}

impl ShaderProcessor {
    pub fn new() -> Self {
        Self {
            instruction_pointer: 0,
            stack_pointer: 0,
            write_mask: i32x4::ALL,
            write_mask_stack: [i32x4::ZERO; SHADER_STACK_DEPTH],
            registers: [f32x4::ZERO; COMPONENT_SLOTS],
        }
    }

    /// Write all four components of a logical register, ignoring the mask.
    /// This is the caller-side input path, not a shader write.
    pub fn write_register(&mut self, index: usize, value: Vec4) {
        assert!(index < SHADER_REGISTER_COUNT);
        let base = index * 4;
        self.registers[base] = value.x;
        self.registers[base + 1] = value.y;
        self.registers[base + 2] = value.z;
        self.registers[base + 3] = value.w;
    }

    pub fn read_register(&self, index: usize) -> Vec4 {
        assert!(index < SHADER_REGISTER_COUNT);
        let base = index * 4;
        Vec4::new(
            self.registers[base],
            self.registers[base + 1],
            self.registers[base + 2],
            self.registers[base + 3],
        )
    }

    /// The current per-lane write mask. All-inactive after a terminating
    /// discard.
    pub fn write_mask(&self) -> i32x4 {
        self.write_mask
    }

    /// Current mask stack depth. Zero before and after any balanced program.
    pub fn stack_depth(&self) -> usize {
        self.stack_pointer
    }

    /// Run `shader` to completion (or early discard) with every lane active.
    pub fn execute(&mut self, shader: &Shader, samplers: &[Sampler; SHADER_SAMPLER_COUNT]) {
        self.execute_masked(shader, i32x4::ALL, samplers)
    }

    /// Run `shader` with a caller-provided coverage mask, e.g. derived from
    /// rasterizer coverage of the quad. Lanes outside `coverage` never have
    /// their registers written.
    pub fn execute_masked(
        &mut self,
        shader: &Shader,
        coverage: i32x4,
        samplers: &[Sampler; SHADER_SAMPLER_COUNT],
    ) {
        self.instruction_pointer = shader.entry_point();
        self.stack_pointer = 0;
        self.write_mask = coverage.truthy();

        while self.instruction_pointer < shader.num_instructions() {
            let instruction = shader.instruction_at(self.instruction_pointer);
            match instruction.op {
                Opcode::Exit => return,
                Opcode::Discard => {
                    if self.op_discard() {
                        return;
                    }
                }
                Opcode::Mov => self.op_mov(instruction),
                Opcode::Add => self.op_arith(instruction, |a, b| a + b),
                Opcode::Sub => self.op_arith(instruction, |a, b| a - b),
                Opcode::Mul => self.op_arith(instruction, |a, b| a * b),
                Opcode::Div => self.op_arith(instruction, |a, b| a / b),
                Opcode::Dot => self.op_dot(instruction),
                Opcode::Sqrt => self.op_sqrt(instruction),
                Opcode::CmpLt => self.op_cmp(instruction, f32x4::cmp_lt),
                Opcode::CmpGt => self.op_cmp(instruction, f32x4::cmp_gt),
                Opcode::CmpLte => self.op_cmp(instruction, f32x4::cmp_lte),
                Opcode::CmpGte => self.op_cmp(instruction, f32x4::cmp_gte),
                Opcode::CmpEq => self.op_cmp(instruction, f32x4::cmp_eq),
                Opcode::CmpNeq => self.op_cmp(instruction, f32x4::cmp_neq),
                Opcode::Ddx => self.op_deriv(instruction, ddx),
                Opcode::Ddy => self.op_deriv(instruction, ddy),
                Opcode::Texture2D => self.op_texture_2d(instruction, samplers),
                Opcode::Texture2DLod => self.op_texture_2d_lod(instruction, samplers),
                Opcode::If => {
                    if self.op_if(instruction) {
                        continue;
                    }
                }
                Opcode::Else => {
                    if self.op_else(instruction) {
                        continue;
                    }
                }
                Opcode::EndIf => self.op_end_if(),
            }
            self.instruction_pointer += 1;
        }
    }

    /// Returns true when execution must terminate because no output lanes
    /// remain.
    fn op_discard(&mut self) -> bool {
        if self.stack_pointer == 0 {
            // discarding at top level rejects all fragments and ends the program
            self.write_mask = i32x4::ZERO;
            return true;
        }

        // a discarded lane stays inactive in every enclosing scope
        for entry in &mut self.write_mask_stack[..self.stack_pointer] {
            *entry = *entry & !self.write_mask;
        }

        // if the outermost scope has no lanes left there is nothing to output
        if self.write_mask_stack[0].none() {
            self.write_mask = self.write_mask_stack[0];
            return true;
        }

        self.write_mask = i32x4::ZERO;
        false
    }

    fn op_mov(&mut self, instruction: Instruction) {
        let src = instruction.arg1 as usize * 4;
        let dst = instruction.dst as usize * 4;
        for component in 0..4 {
            let value = self.registers[src + component];
            self.set_register(dst + component, value);
        }
    }

    fn op_arith(&mut self, instruction: Instruction, f: impl Fn(f32x4, f32x4) -> f32x4) {
        let in1 = instruction.arg1 as usize * 4;
        let in2 = instruction.arg2 as usize * 4;
        let dst = instruction.dst as usize * 4;
        for component in 0..4 {
            let value = f(self.registers[in1 + component], self.registers[in2 + component]);
            self.set_register(dst + component, value);
        }
    }

    fn op_cmp(&mut self, instruction: Instruction, f: impl Fn(f32x4, f32x4) -> i32x4) {
        let in1 = instruction.arg1 as usize * 4;
        let in2 = instruction.arg2 as usize * 4;
        let dst = instruction.dst as usize * 4;
        for component in 0..4 {
            let lanes = f(self.registers[in1 + component], self.registers[in2 + component]);
            self.set_register(dst + component, f32x4::from_bits(lanes));
        }
    }

    /// Four component dot product, broadcast into every destination component.
    fn op_dot(&mut self, instruction: Instruction) {
        let a = self.read_register(instruction.arg1 as usize);
        let b = self.read_register(instruction.arg2 as usize);
        let dot = a.x * b.x + a.y * b.y + a.z * b.z + a.w * b.w;

        let dst = instruction.dst as usize * 4;
        for component in 0..4 {
            self.set_register(dst + component, dot);
        }
    }

    fn op_sqrt(&mut self, instruction: Instruction) {
        let src = instruction.arg1 as usize * 4;
        let dst = instruction.dst as usize * 4;
        for component in 0..4 {
            let value = self.registers[src + component].sqrt();
            self.set_register(dst + component, value);
        }
    }

    fn op_deriv(&mut self, instruction: Instruction, f: fn(f32x4) -> f32x4) {
        let src = instruction.arg1 as usize * 4;
        let dst = instruction.dst as usize * 4;
        for component in 0..4 {
            let value = f(self.registers[src + component]);
            self.set_register(dst + component, value);
        }
    }

    fn op_texture_2d(&mut self, instruction: Instruction, samplers: &[Sampler; SHADER_SAMPLER_COUNT]) {
        let uv = instruction.arg2 as usize * 4;
        let uv = Vec2::new(self.registers[uv], self.registers[uv + 1]);
        let sample = samplers[instruction.arg1 as usize].sample_2d(uv);
        self.write_sample(instruction.dst, sample);
    }

    /// Like [`Self::op_texture_2d`], but the level of detail is taken from
    /// the z component of the UV register.
    fn op_texture_2d_lod(&mut self, instruction: Instruction, samplers: &[Sampler; SHADER_SAMPLER_COUNT]) {
        let base = instruction.arg2 as usize * 4;
        let uv = Vec2::new(self.registers[base], self.registers[base + 1]);
        let lod = self.registers[base + 2];
        let sample = samplers[instruction.arg1 as usize].sample_2d_lod(uv, lod);
        self.write_sample(instruction.dst, sample);
    }

    /// Returns true when the branch body was skipped; the instruction pointer
    /// then already rests on the matching `Else`/`EndIf`.
    fn op_if(&mut self, instruction: Instruction) -> bool {
        assert!(self.stack_pointer < SHADER_STACK_DEPTH, "mask stack overflow");
        self.write_mask_stack[self.stack_pointer] = self.write_mask;
        self.stack_pointer += 1;

        // lane truthiness is the bit pattern of the condition's x component,
        // normalized so the discard/else complements stay exact
        let cond = self.registers[instruction.arg1 as usize * 4].to_bits().truthy();
        self.write_mask = self.write_mask & cond;

        if self.write_mask.none() {
            self.instruction_pointer += instruction.arg2 as usize;
            return true;
        }
        false
    }

    fn op_else(&mut self, instruction: Instruction) -> bool {
        // lanes of the parent scope that did not take the `If` branch
        let parent = self.write_mask_stack[self.stack_pointer - 1];
        self.write_mask = parent & !self.write_mask;

        if self.write_mask.none() {
            self.instruction_pointer += instruction.arg2 as usize;
            return true;
        }
        false
    }

    fn op_end_if(&mut self) {
        self.stack_pointer -= 1;
        self.write_mask = self.write_mask_stack[self.stack_pointer];
    }

    #[inline(always)]
    fn set_register(&mut self, slot: usize, value: f32x4) {
        self.registers[slot] = self.write_mask.blend(value, self.registers[slot]);
    }

    fn write_sample(&mut self, dst: u8, sample: Vec4) {
        let dst = dst as usize * 4;
        self.set_register(dst, sample.x);
        self.set_register(dst + 1, sample.y);
        self.set_register(dst + 2, sample.z);
        self.set_register(dst + 3, sample.w);
    }
}

impl Default for ShaderProcessor {
    fn default() -> Self {
        Self::new()
    }
}
