//! The abstract machine state: accumulator, floor storage, and I/O queues.

use std::collections::VecDeque;

use indexmap::IndexMap;

use hrlc_core::{DEFAULT_FLOOR_MAX, HrmValue};

use crate::RuntimeError;

/// Numbered storage cells, bounded by the program's floor_max.
#[derive(Debug, Clone)]
pub struct Floor {
    cells: IndexMap<u32, HrmValue>,
    max: u32,
}

impl Floor {
    pub fn new(max: u32) -> Self {
        Self {
            cells: IndexMap::new(),
            max,
        }
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    fn index_of(&self, index: i32) -> Result<u32, RuntimeError> {
        if index < 0 || index as u32 > self.max {
            return Err(RuntimeError::FloorIndexOutOfRange {
                index,
                max: self.max,
            });
        }
        Ok(index as u32)
    }

    pub fn store(&mut self, index: i32, value: HrmValue) -> Result<(), RuntimeError> {
        let index = self.index_of(index)?;
        self.cells.insert(index, value);
        Ok(())
    }

    /// Reading an empty cell is a runtime fault, like picking up nothing.
    pub fn load(&self, index: i32) -> Result<HrmValue, RuntimeError> {
        let index = self.index_of(index)?;
        self.cells
            .get(&index)
            .copied()
            .ok_or(RuntimeError::EmptyFloorCell { index })
    }

    pub fn cells(&self) -> impl Iterator<Item = (u32, HrmValue)> + '_ {
        self.cells.iter().map(|(&i, &v)| (i, v))
    }
}

impl Default for Floor {
    fn default() -> Self {
        Self::new(DEFAULT_FLOOR_MAX)
    }
}

/// The machine: one register, the floor, and the two queues.
#[derive(Debug, Clone, Default)]
pub struct Machine {
    pub accumulator: Option<HrmValue>,
    pub floor: Floor,
    input: VecDeque<HrmValue>,
    output: Vec<HrmValue>,
}

impl Machine {
    pub fn new(floor_max: u32) -> Self {
        Self {
            accumulator: None,
            floor: Floor::new(floor_max),
            input: VecDeque::new(),
            output: Vec::new(),
        }
    }

    pub fn feed(&mut self, values: impl IntoIterator<Item = HrmValue>) {
        self.input.extend(values);
    }

    /// `None` when the queue is exhausted: the program halts normally.
    pub fn pop_input(&mut self) -> Option<HrmValue> {
        self.input.pop_front()
    }

    pub fn push_output(&mut self, value: HrmValue) {
        self.output.push(value);
    }

    pub fn output(&self) -> &[HrmValue] {
        &self.output
    }

    pub fn into_output(self) -> Vec<HrmValue> {
        self.output
    }
}
