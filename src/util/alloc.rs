use std::cell::Cell;
use std::rc::Rc;

/// A zero-sized type for checking that containers handle unsized values without allocating.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Zst;

/// A value that increments a shared counter whenever an instance (the original or any clone) is
/// dropped, for verifying the drop behavior of containers.
#[derive(Debug)]
pub struct DropCounter {
    drops: Rc<Cell<usize>>,
}

impl DropCounter {
    pub fn new() -> DropCounter {
        DropCounter {
            drops: Rc::new(Cell::new(0)),
        }
    }

    /// The number of instances sharing this counter that have been dropped so far.
    pub fn drops(&self) -> usize {
        self.drops.get()
    }
}

impl Clone for DropCounter {
    fn clone(&self) -> Self {
        DropCounter {
            drops: Rc::clone(&self.drops),
        }
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
