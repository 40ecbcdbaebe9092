//! `ANY` and `ANY DEFINED BY` support.
//!
//! The concrete type of an open field is chosen at decode time by a
//! discriminator read earlier in the same structure: an integer or an OID.
//! An [`AnyRegistry`] maps discriminators to [`AnyInfo`] entries, each
//! holding a prototype of the concrete type. An [`AnyValue`] is bound to an
//! entry, then decoded by cloning the prototype and decoding into the clone.
//!
//! # Example
//!
//! ```
//! use snacc_ber::{AnyRegistry, AnyValue, ByteCursor, Decoder, Encode, OctetString};
//!
//! let registry = AnyRegistry::new();
//! registry.register_by_int(1, 5, OctetString::default());
//!
//! let mut value = AnyValue::new();
//! value.set_type_by_int(&registry, 5).unwrap();
//!
//! let mut buf = ByteCursor::for_read(vec![0x04, 0x02, b'h', b'i']);
//! let mut dec = Decoder::new(&mut buf, &registry);
//! value.decode(&mut dec).unwrap();
//! assert_eq!(value.get::<OctetString>().unwrap().as_bytes(), b"hi");
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::ber::{ByteCursor, Decoder};
use crate::error::{EncodeErrorKind, Error, Result};
use crate::oid::Oid;
use crate::types::{Decode, Encode};

/// A value that can sit behind an `ANY` field.
///
/// Implemented for every type that is [`Encode`] + [`Decode`] + `Clone` +
/// `PartialEq` + `Debug`, so prototypes are plain values.
pub trait AnyType: fmt::Debug + Send + Sync + 'static {
    /// Encode as a complete TLV.
    fn encode_dyn(&self, buf: &mut ByteCursor) -> Result<usize>;

    /// Decode a complete TLV, replacing `self`.
    fn decode_dyn(&mut self, dec: &mut Decoder<'_>) -> Result<()>;

    /// Clone into a new box.
    fn clone_box(&self) -> Box<dyn AnyType>;

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Compare with another payload of possibly different type.
    fn eq_dyn(&self, other: &dyn AnyType) -> bool;
}

impl<T> AnyType for T
where
    T: Encode + Decode + Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    fn encode_dyn(&self, buf: &mut ByteCursor) -> Result<usize> {
        self.encode(buf)
    }

    fn decode_dyn(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        *self = T::decode(dec)?;
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn AnyType> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_dyn(&self, other: &dyn AnyType) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }
}

impl Clone for Box<dyn AnyType> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

/// Key selecting the concrete type of an `ANY DEFINED BY` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Discriminator {
    /// Integer identifier.
    Int(i64),
    /// Object identifier.
    Oid(Oid),
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "integer {}", id),
            Self::Oid(oid) => write!(f, "OID {}", oid),
        }
    }
}

impl From<i64> for Discriminator {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<Oid> for Discriminator {
    fn from(oid: Oid) -> Self {
        Self::Oid(oid)
    }
}

/// One registry entry.
#[derive(Debug)]
pub struct AnyInfo {
    any_id: u32,
    discriminator: Discriminator,
    prototype: Box<dyn AnyType>,
}

impl AnyInfo {
    /// Small numeric tag given at registration.
    pub fn any_id(&self) -> u32 {
        self.any_id
    }

    /// The discriminator this entry is registered under.
    pub fn discriminator(&self) -> &Discriminator {
        &self.discriminator
    }

    /// The prototype instance.
    pub fn prototype(&self) -> &dyn AnyType {
        &*self.prototype
    }

    /// Returns true if the prototype is a `T`.
    pub fn is<T: AnyType>(&self) -> bool {
        self.prototype.as_any().is::<T>()
    }
}

#[derive(Debug, Default)]
struct Tables {
    by_int: HashMap<i64, Arc<AnyInfo>>,
    by_oid: HashMap<Oid, Arc<AnyInfo>>,
}

/// Discriminator to prototype mapping.
///
/// Registration and lookup take `&self` and may happen from any thread.
/// Entries are handed out as `Arc<AnyInfo>`, so the lock is only held for
/// the map operation itself, never while a payload decodes.
#[derive(Debug, Default)]
pub struct AnyRegistry {
    tables: Mutex<Tables>,
}

impl AnyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, created on first use.
    pub fn global() -> &'static AnyRegistry {
        static GLOBAL: OnceLock<AnyRegistry> = OnceLock::new();
        GLOBAL.get_or_init(AnyRegistry::new)
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // Map operations cannot leave the tables half-updated
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `prototype` under an integer discriminator.
    ///
    /// Registering a discriminator again replaces the earlier entry, which
    /// is returned.
    pub fn register_by_int(
        &self,
        any_id: u32,
        id: i64,
        prototype: impl AnyType,
    ) -> Option<Arc<AnyInfo>> {
        let info = Arc::new(AnyInfo {
            any_id,
            discriminator: Discriminator::Int(id),
            prototype: Box::new(prototype),
        });
        let previous = self.tables().by_int.insert(id, info);
        log_registration(any_id, &Discriminator::Int(id), previous.as_deref());
        previous
    }

    /// Register `prototype` under an OID discriminator.
    ///
    /// Same replacement rule as [`register_by_int`](Self::register_by_int).
    pub fn register_by_oid(
        &self,
        any_id: u32,
        oid: Oid,
        prototype: impl AnyType,
    ) -> Option<Arc<AnyInfo>> {
        let discriminator = Discriminator::Oid(oid.clone());
        let info = Arc::new(AnyInfo {
            any_id,
            discriminator: discriminator.clone(),
            prototype: Box::new(prototype),
        });
        let previous = self.tables().by_oid.insert(oid, info);
        log_registration(any_id, &discriminator, previous.as_deref());
        previous
    }

    /// Look up an integer discriminator.
    pub fn resolve_by_int(&self, id: i64) -> Option<Arc<AnyInfo>> {
        self.tables().by_int.get(&id).cloned()
    }

    /// Look up an OID discriminator.
    pub fn resolve_by_oid(&self, oid: &Oid) -> Option<Arc<AnyInfo>> {
        self.tables().by_oid.get(oid).cloned()
    }

    /// Look up an OID discriminator given as BER content octets.
    ///
    /// Content that is not a valid OID encoding resolves to nothing.
    pub fn resolve_by_oid_content(&self, content: &[u8]) -> Option<Arc<AnyInfo>> {
        let oid = Oid::from_ber(content).ok()?;
        self.resolve_by_oid(&oid)
    }

    /// Look up either kind of discriminator.
    pub fn resolve(&self, discriminator: &Discriminator) -> Option<Arc<AnyInfo>> {
        match discriminator {
            Discriminator::Int(id) => self.resolve_by_int(*id),
            Discriminator::Oid(oid) => self.resolve_by_oid(oid),
        }
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        let tables = self.tables();
        tables.by_int.len() + tables.by_oid.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn log_registration(any_id: u32, discriminator: &Discriminator, previous: Option<&AnyInfo>) {
    match previous {
        Some(previous) => tracing::warn!(
            ber.any_id = any_id,
            ber.discriminator = %discriminator,
            ber.replaced_any_id = previous.any_id,
            "ANY discriminator registered twice, replacing earlier entry"
        ),
        None => tracing::debug!(
            ber.any_id = any_id,
            ber.discriminator = %discriminator,
            "registered ANY type"
        ),
    }
}

/// Binding state of an [`AnyValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyState {
    /// No registry entry bound.
    Unbound,
    /// Bound to an entry, no payload yet.
    Bound,
    /// Bound and holding a payload.
    Populated,
}

/// An `ANY` field.
///
/// Starts [`Unbound`](AnyState::Unbound). A successful
/// [`set_type_by_int`](Self::set_type_by_int) or
/// [`set_type_by_oid`](Self::set_type_by_oid) binds it; decoding or
/// [`set_value`](Self::set_value) then populates it. Binding to a different
/// entry drops any payload; a failed lookup returns it to unbound.
#[derive(Debug, Clone, Default)]
pub struct AnyValue {
    info: Option<Arc<AnyInfo>>,
    value: Option<Box<dyn AnyType>>,
}

impl AnyValue {
    /// Create an unbound value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a value bound to `info` with no payload.
    pub fn bound(info: Arc<AnyInfo>) -> Self {
        Self {
            info: Some(info),
            value: None,
        }
    }

    /// Create a populated value.
    ///
    /// Fails with [`Error::AnyTypeMismatch`] if `value` is not the type of
    /// the entry's prototype.
    pub fn with_value<T: AnyType>(info: Arc<AnyInfo>, value: T) -> Result<Self> {
        let mut any = Self::bound(info);
        any.set_value(value)?;
        Ok(any)
    }

    /// Current state.
    pub fn state(&self) -> AnyState {
        match (&self.info, &self.value) {
            (None, _) => AnyState::Unbound,
            (Some(_), None) => AnyState::Bound,
            (Some(_), Some(_)) => AnyState::Populated,
        }
    }

    /// The bound registry entry.
    pub fn info(&self) -> Option<&Arc<AnyInfo>> {
        self.info.as_ref()
    }

    /// Bind via an integer discriminator.
    ///
    /// On a miss the value becomes unbound and [`Error::UnresolvedAny`] is
    /// returned; whether that is fatal is the caller's decision.
    pub fn set_type_by_int(&mut self, registry: &AnyRegistry, id: i64) -> Result<()> {
        self.set_type(registry, &Discriminator::Int(id))
    }

    /// Bind via an OID discriminator.
    ///
    /// Same failure behavior as [`set_type_by_int`](Self::set_type_by_int).
    pub fn set_type_by_oid(&mut self, registry: &AnyRegistry, oid: &Oid) -> Result<()> {
        match registry.resolve_by_oid(oid) {
            Some(info) => {
                self.bind(info);
                Ok(())
            }
            None => Err(self.unresolved(Discriminator::Oid(oid.clone()))),
        }
    }

    /// Bind via either kind of discriminator.
    pub fn set_type(&mut self, registry: &AnyRegistry, discriminator: &Discriminator) -> Result<()> {
        match registry.resolve(discriminator) {
            Some(info) => {
                self.bind(info);
                Ok(())
            }
            None => Err(self.unresolved(discriminator.clone())),
        }
    }

    fn bind(&mut self, info: Arc<AnyInfo>) {
        let same = self
            .info
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &info));
        if !same {
            self.value = None;
        }
        tracing::trace!(
            ber.any_id = info.any_id,
            ber.discriminator = %info.discriminator,
            "bound ANY value"
        );
        self.info = Some(info);
    }

    fn unresolved(&mut self, discriminator: Discriminator) -> Error {
        tracing::trace!(ber.discriminator = %discriminator, "unresolved ANY discriminator");
        self.info = None;
        self.value = None;
        Error::UnresolvedAny { discriminator }
    }

    /// Set the payload.
    ///
    /// The value must be bound, and `value` must be the prototype's type.
    pub fn set_value<T: AnyType>(&mut self, value: T) -> Result<()> {
        let info = self.info.as_ref().ok_or(Error::UnboundAny)?;
        if !info.is::<T>() {
            return Err(Error::AnyTypeMismatch {
                any_id: info.any_id,
            });
        }
        self.value = Some(Box::new(value));
        Ok(())
    }

    /// The payload, if populated.
    pub fn value(&self) -> Option<&dyn AnyType> {
        self.value.as_deref()
    }

    /// The payload as a concrete type.
    pub fn get<T: AnyType>(&self) -> Option<&T> {
        self.value.as_deref()?.as_any().downcast_ref::<T>()
    }

    /// Remove and return the payload, leaving the value bound.
    pub fn take_value(&mut self) -> Option<Box<dyn AnyType>> {
        self.value.take()
    }

    /// Decode the payload using the bound entry's prototype.
    ///
    /// Fails with [`Error::UnboundAny`] if no type was set first.
    pub fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        let info = self.info.clone().ok_or(Error::UnboundAny)?;
        let offset = dec.offset();
        let mut value = info.prototype.clone_box();
        value.decode_dyn(dec)?;
        tracing::trace!(
            ber.any_id = info.any_id,
            ber.offset = offset,
            "decoded ANY payload"
        );
        self.value = Some(value);
        Ok(())
    }

    /// Bind by `discriminator` in the decoder's registry and decode.
    ///
    /// Convenience for `ANY DEFINED BY` fields whose discriminator has
    /// already been read.
    pub fn decode_defined_by(dec: &mut Decoder<'_>, discriminator: &Discriminator) -> Result<Self> {
        let mut any = Self::new();
        any.set_type(dec.registry(), discriminator)?;
        any.decode(dec)?;
        Ok(any)
    }
}

impl Encode for AnyValue {
    fn encode(&self, buf: &mut ByteCursor) -> Result<usize> {
        if self.info.is_none() {
            return Err(Error::encode(EncodeErrorKind::UnboundAny));
        }
        let value = self
            .value
            .as_deref()
            .ok_or(Error::encode(EncodeErrorKind::EmptyAny))?;
        value.encode_dyn(buf)
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        let same_info = match (&self.info, &other.info) {
            (None, None) => true,
            (Some(a), Some(b)) => a.any_id == b.any_id && a.discriminator == b.discriminator,
            _ => false,
        };
        let same_value = match (&self.value, &other.value) {
            (None, None) => true,
            (Some(a), Some(b)) => a.eq_dyn(&**b),
            _ => false,
        };
        same_info && same_value
    }
}
