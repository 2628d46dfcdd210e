/// An enum representing the recognized opcodes of the chip-8 architecture
///
/// Operand fields sit at fixed nibble positions of the 16-bit instruction:
/// `X = (op >> 8) & 0xF`, `Y = (op >> 4) & 0xF`, `N = op & 0xF`,
/// `NN = op & 0xFF`, `NNN = op & 0xFFF`.
///
/// Decoding never fails hard: instructions with no match in their family's
/// secondary table come back as `None` and are treated as no-ops by the
/// machine.
///
/// Examples:
/// ```
/// use plum8::opcode::OpCode;
///
/// assert_eq!(OpCode::decode(0x00E0), Some(OpCode::_00E0));
/// assert_eq!(
///     OpCode::decode(0x6A42),
///     Some(OpCode::_6XNN { x: 0xA, nn: 0x42 }),
/// );
/// assert_eq!(OpCode::decode(0xFA18), None);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OpCode {
    /// Clear the screen
    _00E0,
    /// Return from a subroutine
    _00EE,
    /// Halt, delegated to the host
    _0FFF,
    /// Jump to address NNN
    _1NNN { nnn: u16 },
    /// Execute subroutine starting at address NNN
    _2NNN { nnn: u16 },
    /// Skip the following instruction if VX equals NN
    _3XNN { x: u8, nn: u8 },
    /// Skip the following instruction if VX is not equal to NN
    _4XNN { x: u8, nn: u8 },
    /// Skip the following instruction if VX is equal to VY
    _5XY0 { x: u8, y: u8 },
    /// Store number NN in register VX
    _6XNN { x: u8, nn: u8 },
    /// Add the value NN to register VX, without touching the carry flag
    _7XNN { x: u8, nn: u8 },
    /// Store the value of register VY in register VX
    _8XY0 { x: u8, y: u8 },
    /// Set VX to VX OR VY
    _8XY1 { x: u8, y: u8 },
    /// Set VX to VX AND VY
    _8XY2 { x: u8, y: u8 },
    /// Set VX to VX XOR VY
    _8XY3 { x: u8, y: u8 },
    /// Add VY to VX, VF becomes 1 on carry and 0 otherwise
    _8XY4 { x: u8, y: u8 },
    /// Subtract VY from VX, VF reports the borrow
    _8XY5 { x: u8, y: u8 },
    /// Shift VX right by one, VF becomes the old least significant bit
    _8XY6 { x: u8, y: u8 },
    /// Set VX to VY minus VX, VF reports the borrow
    _8XY7 { x: u8, y: u8 },
    /// Shift VX left by one, VF becomes the old most significant bit
    _8XYE { x: u8, y: u8 },
    /// Skip the following instruction if VX is not equal to VY
    _9XY0 { x: u8, y: u8 },
    /// Store memory address NNN in register I
    _ANNN { nnn: u16 },
    /// Jump to address NNN + V0
    _BNNN { nnn: u16 },
    /// Set VX to a random number with a mask of NN
    _CXNN { x: u8, nn: u8 },
    /// Draw an N row sprite from memory at I at position (VX, VY)
    _DXYN { x: u8, y: u8, n: u8 },
    /// Skip the following instruction if the key with the value of VX is pressed
    _EX9E { x: u8 },
    /// Skip the following instruction if the key with the value of VX is not pressed
    _EXA1 { x: u8 },
    /// Store the current value of the delay timer in register VX
    _FX07 { x: u8 },
    /// Pause execution until a keypress is captured into register VX
    _FX0A { x: u8 },
    /// Set the delay timer to the value of register VX
    _FX15 { x: u8 },
    /// Add the value of register VX to register I
    _FX1E { x: u8 },
    /// Set I to the address of the font sprite for the digit in VX
    _FX29 { x: u8 },
    /// Store the binary-coded decimal of VX at addresses I, I+1 and I+2
    _FX33 { x: u8 },
    /// Store registers V0 to VX inclusive in memory starting at address I
    _FX55 { x: u8 },
    /// Fill registers V0 to VX inclusive from memory starting at address I
    _FX65 { x: u8 },
}

impl OpCode {
    fn read_first(raw: u16) -> u8 {
        (raw >> 12 & 0x000Fu16) as u8
    }

    fn read_last(raw: u16) -> u8 {
        (raw & 0x000Fu16) as u8
    }

    fn read_x(raw: u16) -> u8 {
        (raw >> 8 & 0x000Fu16) as u8
    }

    fn read_y(raw: u16) -> u8 {
        (raw >> 4 & 0x000Fu16) as u8
    }

    fn read_nn(raw: u16) -> u8 {
        (raw & 0x00FFu16) as u8
    }

    fn read_nnn(raw: u16) -> u16 {
        raw & 0x0FFFu16
    }

    pub fn decode(raw: u16) -> Option<Self> {
        let op = match Self::read_first(raw) {
            0x0u8 => match raw {
                0x00E0u16 => OpCode::_00E0,
                0x00EEu16 => OpCode::_00EE,
                0x0FFFu16 => OpCode::_0FFF,
                _ => return None,
            },
            0x1u8 => OpCode::_1NNN {
                nnn: Self::read_nnn(raw),
            },
            0x2u8 => OpCode::_2NNN {
                nnn: Self::read_nnn(raw),
            },
            0x3u8 => OpCode::_3XNN {
                x: Self::read_x(raw),
                nn: Self::read_nn(raw),
            },
            0x4u8 => OpCode::_4XNN {
                x: Self::read_x(raw),
                nn: Self::read_nn(raw),
            },
            0x5u8 => match Self::read_last(raw) {
                0x0u8 => OpCode::_5XY0 {
                    x: Self::read_x(raw),
                    y: Self::read_y(raw),
                },
                _ => return None,
            },
            0x6u8 => OpCode::_6XNN {
                x: Self::read_x(raw),
                nn: Self::read_nn(raw),
            },
            0x7u8 => OpCode::_7XNN {
                x: Self::read_x(raw),
                nn: Self::read_nn(raw),
            },
            0x8u8 => {
                let x = Self::read_x(raw);
                let y = Self::read_y(raw);
                match Self::read_last(raw) {
                    0x0u8 => OpCode::_8XY0 { x, y },
                    0x1u8 => OpCode::_8XY1 { x, y },
                    0x2u8 => OpCode::_8XY2 { x, y },
                    0x3u8 => OpCode::_8XY3 { x, y },
                    0x4u8 => OpCode::_8XY4 { x, y },
                    0x5u8 => OpCode::_8XY5 { x, y },
                    0x6u8 => OpCode::_8XY6 { x, y },
                    0x7u8 => OpCode::_8XY7 { x, y },
                    0xEu8 => OpCode::_8XYE { x, y },
                    _ => return None,
                }
            }
            0x9u8 => match Self::read_last(raw) {
                0x0u8 => OpCode::_9XY0 {
                    x: Self::read_x(raw),
                    y: Self::read_y(raw),
                },
                _ => return None,
            },
            0xAu8 => OpCode::_ANNN {
                nnn: Self::read_nnn(raw),
            },
            0xBu8 => OpCode::_BNNN {
                nnn: Self::read_nnn(raw),
            },
            0xCu8 => OpCode::_CXNN {
                x: Self::read_x(raw),
                nn: Self::read_nn(raw),
            },
            0xDu8 => OpCode::_DXYN {
                x: Self::read_x(raw),
                y: Self::read_y(raw),
                n: Self::read_last(raw),
            },
            0xEu8 => {
                let x = Self::read_x(raw);
                match Self::read_nn(raw) {
                    0x9Eu8 => OpCode::_EX9E { x },
                    0xA1u8 => OpCode::_EXA1 { x },
                    _ => return None,
                }
            }
            0xFu8 => {
                let x = Self::read_x(raw);
                match Self::read_nn(raw) {
                    0x07u8 => OpCode::_FX07 { x },
                    0x0Au8 => OpCode::_FX0A { x },
                    0x15u8 => OpCode::_FX15 { x },
                    0x1Eu8 => OpCode::_FX1E { x },
                    0x29u8 => OpCode::_FX29 { x },
                    0x33u8 => OpCode::_FX33 { x },
                    0x55u8 => OpCode::_FX55 { x },
                    0x65u8 => OpCode::_FX65 { x },
                    _ => return None,
                }
            }
            _ => unreachable!(),
        };
        Some(op)
    }
}
