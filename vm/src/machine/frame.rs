use memory::Value;

/// A position in the function table: function id and instruction address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallInfo {
    pub address: usize,
    pub function: usize,
}

impl CallInfo {
    pub fn new(function: usize, address: usize) -> Self {
        Self { address, function }
    }
}

/// Represents a single call frame in the execution stack.
///
/// Each frame tracks:
/// - `from`: the `CALL` instruction that created it
/// - `to`: the entry point of the called function
/// - `stack`: the frame's own operand stack
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallFrame {
    pub from: CallInfo,
    pub to: CallInfo,
    pub stack: Vec<Value>,
}

impl CallFrame {
    pub fn new(from: CallInfo, to: CallInfo) -> Self {
        Self {
            from,
            to,
            stack: Vec::new(),
        }
    }

    pub fn push(&mut self, value: Value) -> usize {
        self.stack.push(value);
        self.stack.len() - 1
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.stack.pop()
    }

    pub fn peek(&self) -> Option<Value> {
        self.stack.last().copied()
    }

    /// Remove the top `count` values, keeping their push order.
    pub fn take_top(&mut self, count: usize) -> Option<Vec<Value>> {
        let start = self.stack.len().checked_sub(count)?;
        Some(self.stack.split_off(start))
    }
}

/// Frames of the running program. Index 0 is the entry frame and is never
/// popped.
#[derive(Debug, Clone)]
pub struct CallStack {
    frames: Vec<CallFrame>,
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}

impl CallStack {
    pub fn new() -> Self {
        Self {
            frames: vec![CallFrame::default()],
        }
    }

    /// Returns the index of the pushed frame.
    pub fn push(&mut self, frame: CallFrame) -> usize {
        self.frames.push(frame);
        self.frames.len() - 1
    }

    /// `None` when only the entry frame is left.
    pub fn pop(&mut self) -> Option<CallFrame> {
        if self.frames.len() == 1 {
            return None;
        }
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn current(&self) -> &CallFrame {
        &self.frames[self.frames.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut CallFrame {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    pub fn get(&self, index: usize) -> Option<&CallFrame> {
        self.frames.get(index)
    }

    /// Drop every frame but the entry frame and clear its stack.
    pub fn reset(&mut self) {
        self.frames.truncate(1);
        self.frames[0] = CallFrame::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pops_return_pushes_in_reverse(values in prop::collection::vec(any::<f64>(), 0..64)) {
            let mut frame = CallFrame::default();
            for (depth, &n) in values.iter().enumerate() {
                prop_assert_eq!(frame.push(Value::number(n)), depth);
            }

            let popped: Vec<Option<Value>> = (0..values.len()).map(|_| frame.pop()).collect();
            let expected: Vec<Option<Value>> =
                values.iter().rev().map(|&n| Some(Value::number(n))).collect();
            prop_assert_eq!(popped, expected);
            prop_assert!(frame.stack.is_empty());
            prop_assert!(frame.pop().is_none());
        }
    }

    #[test]
    fn entry_frame_cannot_be_popped() {
        let mut stack = CallStack::new();
        assert_eq!(stack.depth(), 1);
        assert!(stack.pop().is_none());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn push_then_pop_restores_depth() {
        let mut stack = CallStack::new();
        for n in 1..=5 {
            let idx = stack.push(CallFrame::new(CallInfo::new(0, n), CallInfo::new(n, 0)));
            assert_eq!(idx, n);
        }
        for n in (1..=5).rev() {
            assert_eq!(stack.pop().map(|f| f.to.function), Some(n));
        }
        assert_eq!(stack.depth(), 1);
        assert!(stack.current().stack.is_empty());
    }

    #[test]
    fn take_top_keeps_order() {
        let mut frame = CallFrame::default();
        for n in 0..4 {
            frame.push(Value::number(n as f64));
        }
        let top = frame.take_top(2).unwrap();
        assert_eq!(top, vec![Value::number(2.0), Value::number(3.0)]);
        assert_eq!(frame.stack.len(), 2);
        assert!(frame.take_top(3).is_none());
        assert_eq!(frame.take_top(0), Some(vec![]));
    }

    #[test]
    fn pop_and_peek_on_empty_frame() {
        let mut frame = CallFrame::default();
        assert!(frame.pop().is_none());
        assert!(frame.peek().is_none());
        frame.push(Value::bool(true));
        assert_eq!(frame.peek(), Some(Value::bool(true)));
        assert_eq!(frame.pop(), Some(Value::bool(true)));
        assert!(frame.stack.is_empty());
    }
}
