//! Typed ports, tokens, and the per-step I/O view handed to algorithms.
//!
//! A port is declared statically by a [`PortSpec`]; at run time each input
//! port owns a FIFO of [`Token`]s written by its single producer. During one
//! processing step an algorithm only sees its own queues through [`StepIo`]:
//! it pops from inputs and stages outputs, and the scheduler routes the staged
//! tokens to consumers after the step returns.

use std::collections::VecDeque;

use super::node::NodeId;

/// Element type carried by a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortType {
    /// One scalar per token (samples, per-frame descriptors).
    Real,
    /// One vector per token (frames, spectra, coefficient vectors).
    Vector,
}

impl PortType {
    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            PortType::Real => "real",
            PortType::Vector => "vector",
        }
    }
}

/// A value travelling over a connection.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Scalar token.
    Real(f32),
    /// Vector token.
    Vector(Vec<f32>),
}

impl Token {
    /// Port type this token belongs to.
    pub fn port_type(&self) -> PortType {
        match self {
            Token::Real(_) => PortType::Real,
            Token::Vector(_) => PortType::Vector,
        }
    }
}

/// Static declaration of one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSpec {
    /// Stable port name.
    pub name: &'static str,
    /// Element type.
    pub port_type: PortType,
    /// Human-readable description.
    pub description: &'static str,
}

impl PortSpec {
    /// Scalar port.
    pub const fn real(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            port_type: PortType::Real,
            description,
        }
    }

    /// Vector port.
    pub const fn vector(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            port_type: PortType::Vector,
            description,
        }
    }
}

/// Address of a port: owning node plus port index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRef {
    /// Owning node.
    pub node: NodeId,
    /// Port index within the node's input or output list.
    pub port: usize,
}

impl PortRef {
    /// Creates a port reference.
    pub const fn new(node: NodeId, port: usize) -> Self {
        Self { node, port }
    }
}

/// The view of a node's queues during a single processing step.
pub struct StepIo<'a> {
    inputs: &'a mut [VecDeque<Token>],
    outputs: &'a mut [Vec<Token>],
    end_of_stream: bool,
}

impl<'a> StepIo<'a> {
    /// Creates a view over `inputs` and staging `outputs`.
    pub fn new(
        inputs: &'a mut [VecDeque<Token>],
        outputs: &'a mut [Vec<Token>],
        end_of_stream: bool,
    ) -> Self {
        Self {
            inputs,
            outputs,
            end_of_stream,
        }
    }

    /// `true` once every producer feeding this node has finished.
    ///
    /// Tokens still queued on the inputs are the last ones this node will see.
    pub fn end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    /// Number of tokens waiting on input `port`.
    pub fn available(&self, port: usize) -> usize {
        self.inputs.get(port).map_or(0, VecDeque::len)
    }

    /// Pops the next token from input `port`.
    pub fn pop(&mut self, port: usize) -> Option<Token> {
        self.inputs.get_mut(port)?.pop_front()
    }

    /// Pops the next vector token from input `port`.
    ///
    /// Returns `None` if the queue is empty or its head is a scalar.
    pub fn pop_vector(&mut self, port: usize) -> Option<Vec<f32>> {
        let queue = self.inputs.get_mut(port)?;
        match queue.front() {
            Some(Token::Vector(_)) => match queue.pop_front() {
                Some(Token::Vector(v)) => Some(v),
                _ => None,
            },
            _ => None,
        }
    }

    /// Moves every queued scalar on input `port` into `dest`.
    ///
    /// Returns the number of scalars moved. Stops at the first vector token.
    pub fn drain_reals(&mut self, port: usize, dest: &mut Vec<f32>) -> usize {
        let Some(queue) = self.inputs.get_mut(port) else {
            return 0;
        };
        let mut moved = 0;
        while let Some(Token::Real(v)) = queue.front() {
            dest.push(*v);
            queue.pop_front();
            moved += 1;
        }
        moved
    }

    /// Stages `token` on output `port`.
    pub fn push(&mut self, port: usize, token: Token) {
        if let Some(out) = self.outputs.get_mut(port) {
            out.push(token);
        }
    }

    /// Stages a scalar on output `port`.
    pub fn push_real(&mut self, port: usize, value: f32) {
        self.push(port, Token::Real(value));
    }

    /// Stages a vector on output `port`.
    pub fn push_vector(&mut self, port: usize, value: Vec<f32>) {
        self.push(port, Token::Vector(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_reals_stops_at_vector() {
        let mut inputs = vec![VecDeque::from(vec![
            Token::Real(1.0),
            Token::Real(2.0),
            Token::Vector(vec![3.0]),
        ])];
        let mut outputs: Vec<Vec<Token>> = Vec::new();
        let mut io = StepIo::new(&mut inputs, &mut outputs, false);

        let mut dest = Vec::new();
        assert_eq!(io.drain_reals(0, &mut dest), 2);
        assert_eq!(dest, [1.0, 2.0]);
        assert_eq!(io.pop_vector(0), Some(vec![3.0]));
        assert_eq!(io.available(0), 0);
    }

    #[test]
    fn pop_vector_leaves_scalar_in_place() {
        let mut inputs = vec![VecDeque::from(vec![Token::Real(1.0)])];
        let mut outputs: Vec<Vec<Token>> = Vec::new();
        let mut io = StepIo::new(&mut inputs, &mut outputs, true);

        assert!(io.end_of_stream());
        assert_eq!(io.pop_vector(0), None);
        assert_eq!(io.available(0), 1);
    }

    #[test]
    fn push_to_missing_port_is_ignored() {
        let mut inputs: Vec<VecDeque<Token>> = Vec::new();
        let mut outputs = vec![Vec::new()];
        let mut io = StepIo::new(&mut inputs, &mut outputs, false);

        io.push_real(0, 1.0);
        io.push_real(3, 2.0);
        assert_eq!(outputs[0], [Token::Real(1.0)]);
    }
}
