//! Michelson types.
//!
//! Comparability is structural: `option`, `or` and `pair` are comparable
//! exactly when their arguments are. The smart constructors [`Type::option`],
//! [`Type::or`] and [`Type::pair`] apply that rule, and the converter only
//! builds types through them.

use crate::annotation::Annotations;
use crate::data::Nat;

/// A type that may be used as a map key, set element or ticket content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComparableType {
    pub node: ComparableNode,
    pub annots: Annotations,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComparableNode {
    Unit,
    Never,
    Bool,
    Int,
    Nat,
    String,
    ChainId,
    Bytes,
    Mutez,
    KeyHash,
    Key,
    Signature,
    Timestamp,
    Address,
    TxRollupL2Address,
    Option(Box<ComparableType>),
    Or(Box<ComparableType>, Box<ComparableType>),
    /// Two or more components.
    Pair(Vec<ComparableType>),
}

/// Any Michelson type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Type {
    pub node: TypeNode,
    pub annots: Annotations,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeNode {
    Comparable(ComparableNode),
    /// Option over a type that is not comparable.
    Option(Box<Type>),
    List(Box<Type>),
    Set(Box<ComparableType>),
    Operation,
    Contract(Box<Type>),
    Ticket(Box<ComparableType>),
    /// Two or more components, at least one not comparable.
    Pair(Vec<Type>),
    /// At least one side not comparable.
    Or(Box<Type>, Box<Type>),
    Lambda(Box<Type>, Box<Type>),
    Map(Box<ComparableType>, Box<Type>),
    BigMap(Box<ComparableType>, Box<Type>),
    Bls12381G1,
    Bls12381G2,
    Bls12381Fr,
    SaplingState(Nat),
    SaplingTransaction(Nat),
    SaplingTransactionDeprecated(Nat),
    Chest,
    ChestKey,
}

impl ComparableType {
    pub fn new(node: ComparableNode) -> Self {
        Self {
            node,
            annots: Annotations::new(),
        }
    }

    pub fn with_annots(mut self, annots: Annotations) -> Self {
        self.annots = annots;
        self
    }
}

impl From<ComparableType> for Type {
    fn from(ty: ComparableType) -> Self {
        Type {
            node: TypeNode::Comparable(ty.node),
            annots: ty.annots,
        }
    }
}

impl From<ComparableNode> for Type {
    fn from(node: ComparableNode) -> Self {
        ComparableType::new(node).into()
    }
}

impl Type {
    pub fn new(node: TypeNode) -> Self {
        Self {
            node,
            annots: Annotations::new(),
        }
    }

    pub fn with_annots(mut self, annots: Annotations) -> Self {
        self.annots = annots;
        self
    }

    pub fn is_comparable(&self) -> bool {
        matches!(self.node, TypeNode::Comparable(_))
    }

    /// This type as a comparable type, if it is one.
    pub fn into_comparable(self) -> Result<ComparableType, Type> {
        match self.node {
            TypeNode::Comparable(node) => Ok(ComparableType {
                node,
                annots: self.annots,
            }),
            node => Err(Type {
                node,
                annots: self.annots,
            }),
        }
    }

    pub fn option(inner: Type) -> Type {
        match inner.into_comparable() {
            Ok(inner) => ComparableNode::Option(Box::new(inner)).into(),
            Err(inner) => Type::new(TypeNode::Option(Box::new(inner))),
        }
    }

    pub fn or(left: Type, right: Type) -> Type {
        match (left.into_comparable(), right.into_comparable()) {
            (Ok(left), Ok(right)) => ComparableNode::Or(Box::new(left), Box::new(right)).into(),
            (left, right) => Type::new(TypeNode::Or(
                Box::new(rejoin(left)),
                Box::new(rejoin(right)),
            )),
        }
    }

    /// A pair of two or more components.
    pub fn pair(items: Vec<Type>) -> Type {
        if items.iter().all(Type::is_comparable) {
            let items = items
                .into_iter()
                .filter_map(|item| item.into_comparable().ok())
                .collect();
            ComparableNode::Pair(items).into()
        } else {
            Type::new(TypeNode::Pair(items))
        }
    }
}

fn rejoin(split: Result<ComparableType, Type>) -> Type {
    match split {
        Ok(ty) => ty.into(),
        Err(ty) => ty,
    }
}
