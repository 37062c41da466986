use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;

/// A hash-addressed value that can be written into the object store.
///
/// Implementors keep their serialized form and its ID in sync: both are
/// rebuilt together whenever the object changes.
pub trait Object {
    fn object_type(&self) -> ObjectType;

    fn oid(&self) -> &ObjectId;

    /// The bytes recorded in the store under [`Object::oid`]
    fn stored_data(&self) -> Bytes;

    fn display(&self) -> String;
}
