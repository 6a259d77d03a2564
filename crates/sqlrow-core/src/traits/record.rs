use crate::traits::Column;
use crate::value::{Value, ValueError};

/// Producer of a record type's field metadata, stored per nested field so
/// plans can walk a destination type without an instance.
pub type FieldsFn = fn() -> &'static [FieldMeta];

///
/// FieldMeta
///
/// One entry of a record's ordered field table. Only fields that
/// participate in decoding appear; untagged fields are invisible to the
/// runtime and are never touched.
///

#[derive(Clone, Copy, Debug)]
pub struct FieldMeta {
    /// Column tag, compared bytewise against column aliases. Empty only
    /// for flattened fields, which contribute no alias segment.
    pub tag: &'static str,
    pub kind: FieldKind,
}

///
/// FieldKind
///

#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    /// A scannable leaf.
    Leaf {
        nilable: bool,
        /// Field type name, for diagnostics.
        ty: &'static str,
    },
    /// A nested record, descended into with its tag as an alias segment.
    Record { nilable: bool, fields: FieldsFn },
    /// An embedded record whose fields belong to the enclosing level.
    Flattened { fields: FieldsFn },
}

///
/// FieldMut
///
/// Mutable access to one field, indexed in `fields()` order.
///

pub enum FieldMut<'a> {
    Leaf(&'a mut dyn ColumnSlot),
    Record(&'a mut dyn RecordSlot),
    Flattened(&'a mut dyn RecordDyn),
}

///
/// FieldRef
///
/// Shared access to one field. Nested records are opaque here: they
/// contribute no scalar cell of their own.
///

pub enum FieldRef<'a> {
    Leaf(&'a dyn ColumnSlot),
    Record,
    Flattened(&'a dyn RecordDyn),
}

///
/// Record
///
/// A compound destination type: a product of tagged fields with stable
/// iteration order. Implemented via `#[derive(Record)]`; the derive also
/// emits the type's [`NestedRecord`] impl.
///
/// `Default` provides the value the orchestrator allocates for fresh
/// sequence elements and on-demand nested records.
///

pub trait Record: Default {
    fn fields() -> &'static [FieldMeta];

    /// Mutable access to the field at `index` in `fields()` order.
    ///
    /// Panics when `index` is out of range; plans only produce indexes
    /// from `fields()`.
    fn field_mut(&mut self, index: usize) -> FieldMut<'_>;

    fn field_ref(&self, index: usize) -> FieldRef<'_>;
}

///
/// RecordDyn
///
/// Object-safe view of [`Record`], used by the decoder to walk nested
/// destinations behind one vtable.
///

pub trait RecordDyn {
    fn field_mut(&mut self, index: usize) -> FieldMut<'_>;
    fn field_ref(&self, index: usize) -> FieldRef<'_>;
}

impl<R: Record> RecordDyn for R {
    fn field_mut(&mut self, index: usize) -> FieldMut<'_> {
        Record::field_mut(self, index)
    }

    fn field_ref(&self, index: usize) -> FieldRef<'_> {
        Record::field_ref(self, index)
    }
}

///
/// NestedRecord
///
/// A field position holding a record: the record itself, or its nilable
/// wrapper. Carries the allocate-on-demand and zeroing behavior the row
/// decoder needs, plus the compile-time facts the derive bakes into
/// [`FieldKind::Record`].
///
/// The derive emits `impl NestedRecord` for every derived record
/// (`NILABLE = false`); the `Option` impl below is the nilable case.
///

pub trait NestedRecord {
    const NILABLE: bool;
    type Target: Record;

    /// Reset to the absent representation (`None`), or to the default
    /// value for non-nilable positions.
    fn clear(&mut self);

    /// Allocate on demand and return the record to decode into.
    fn materialize(&mut self) -> &mut dyn RecordDyn;
}

impl<R: Record> NestedRecord for Option<R> {
    const NILABLE: bool = true;
    type Target = R;

    fn clear(&mut self) {
        *self = None;
    }

    fn materialize(&mut self) -> &mut dyn RecordDyn {
        self.get_or_insert_with(R::default)
    }
}

///
/// ColumnSlot
///
/// Object-safe adapter over [`Column`] for one leaf field.
///

pub trait ColumnSlot {
    fn nilable(&self) -> bool;

    /// Decode the cell and overwrite the slot. Overwriting is
    /// unconditional: a null cell zeroes a nilable slot rather than
    /// leaving a previous value behind.
    fn store(&mut self, value: Value) -> Result<(), ValueError>;

    fn to_value(&self) -> Value;
}

impl<T: Column> ColumnSlot for T {
    fn nilable(&self) -> bool {
        T::NILABLE
    }

    fn store(&mut self, value: Value) -> Result<(), ValueError> {
        *self = T::from_value(value)?;
        Ok(())
    }

    fn to_value(&self) -> Value {
        Column::to_value(self)
    }
}

///
/// RecordSlot
///
/// Object-safe adapter over [`NestedRecord`] for one nested-record field.
///

pub trait RecordSlot {
    fn nilable(&self) -> bool;
    fn clear(&mut self);
    fn materialize(&mut self) -> &mut dyn RecordDyn;
}

impl<T: NestedRecord> RecordSlot for T {
    fn nilable(&self) -> bool {
        T::NILABLE
    }

    fn clear(&mut self) {
        NestedRecord::clear(self);
    }

    fn materialize(&mut self) -> &mut dyn RecordDyn {
        NestedRecord::materialize(self)
    }
}
