use thiserror::Error;

/// Returned by [`Stack::pop`] and [`Stack::peek`] when there is nothing on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Stack is empty")]
pub struct EmptyStack;

/// A LIFO container with no capacity limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an item to the top of the stack
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove and return the top item from the stack
    pub fn pop(&mut self) -> Result<T, EmptyStack> {
        self.items.pop().ok_or(EmptyStack)
    }

    /// Return the top item without removing it
    pub fn peek(&self) -> Result<&T, EmptyStack> {
        self.items.last().ok_or(EmptyStack)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Iterate from the bottom of the stack to the top.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}
