//! [`Container`] and [`Store`] over real HDF5 files, through `hdf5-metno`.
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use hdf5_metno as hdf5;

use hdf5::types::{
    FixedAscii, FixedUnicode, FloatSize, TypeDescriptor, VarLenAscii, VarLenUnicode,
};
use hdf5::{Attribute, Dataset, File, H5Type, Location, LocationType};
use ndarray::s;

use crate::container::{Container, NodeKind, NodePath, OpenMode, Store};
use crate::error::{Error, Result};
use crate::value::Value;

/// Fixed-length strings are read through a buffer of this many bytes; the
/// library truncates longer values.
const MAX_FIXED_STRING: usize = 1024;

impl From<hdf5::Error> for Error {
    fn from(e: hdf5::Error) -> Self {
        Error::Backend(e.to_string())
    }
}

impl From<hdf5::types::StringError> for Error {
    fn from(e: hdf5::types::StringError) -> Self {
        Error::Backend(e.to_string())
    }
}

/// Element types that can be turned into a [`Value`].
trait ToValue: H5Type + Clone {
    fn to_value(&self) -> Value;
}

impl ToValue for i64 {
    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl ToValue for u64 {
    fn to_value(&self) -> Value {
        Value::UInt(*self)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float32(*self)
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for VarLenUnicode {
    fn to_value(&self) -> Value {
        Value::Text(self.as_str().to_string())
    }
}

impl ToValue for VarLenAscii {
    fn to_value(&self) -> Value {
        Value::Text(self.as_str().to_string())
    }
}

impl<const N: usize> ToValue for FixedAscii<N> {
    fn to_value(&self) -> Value {
        Value::Text(self.as_str().to_string())
    }
}

impl<const N: usize> ToValue for FixedUnicode<N> {
    fn to_value(&self) -> Value {
        Value::Text(self.as_str().to_string())
    }
}

/// Call `$func::<T>(args)` with the memory type matching a stored datatype.
/// Integers widen to 64 bits; strings keep their storage class.
macro_rules! by_type {
    ($desc:expr, $func:ident ( $($arg:expr),* )) => {
        match $desc {
            TypeDescriptor::Integer(_) => $func::<i64>($($arg),*),
            TypeDescriptor::Unsigned(_) => $func::<u64>($($arg),*),
            TypeDescriptor::Float(FloatSize::U4) => $func::<f32>($($arg),*),
            TypeDescriptor::Float(_) => $func::<f64>($($arg),*),
            TypeDescriptor::Boolean => $func::<bool>($($arg),*),
            TypeDescriptor::VarLenUnicode => $func::<VarLenUnicode>($($arg),*),
            TypeDescriptor::VarLenAscii => $func::<VarLenAscii>($($arg),*),
            TypeDescriptor::FixedAscii(_) => $func::<FixedAscii<MAX_FIXED_STRING>>($($arg),*),
            TypeDescriptor::FixedUnicode(_) => $func::<FixedUnicode<MAX_FIXED_STRING>>($($arg),*),
            other => Err(hdf5::Error::Internal(format!("unsupported datatype: {:?}", other))),
        }
    };
}

fn elements<T: ToValue>(ds: &Dataset, range: Range<usize>) -> hdf5::Result<Vec<Value>> {
    let block = ds.read_slice_1d::<T, _>(s![range.start..range.end])?;
    Ok(block.iter().map(ToValue::to_value).collect())
}

fn rows<T: ToValue>(ds: &Dataset, range: Range<usize>) -> hdf5::Result<Vec<Vec<Value>>> {
    let block = ds.read_slice_2d::<T, _>(s![range.start..range.end, ..])?;
    Ok(block
        .outer_iter()
        .map(|row| row.iter().map(ToValue::to_value).collect())
        .collect())
}

fn scalar<T: ToValue>(attr: &Attribute) -> hdf5::Result<Value> {
    Ok(attr.read_scalar::<T>()?.to_value())
}

/// Array attributes are shown as `[a b c]`, the way numpy prints them.
fn array<T: ToValue>(attr: &Attribute) -> hdf5::Result<Value> {
    let items: Vec<String> = attr
        .read_raw::<T>()?
        .iter()
        .map(|v| v.to_value().to_string())
        .collect();
    Ok(Value::Text(format!("[{}]", items.join(" "))))
}

/// Short name for a datatype [`read_attr`] cannot convert.
fn unreadable_label(desc: &TypeDescriptor) -> Option<&'static str> {
    match desc {
        TypeDescriptor::Integer(_)
        | TypeDescriptor::Unsigned(_)
        | TypeDescriptor::Float(_)
        | TypeDescriptor::Boolean
        | TypeDescriptor::VarLenUnicode
        | TypeDescriptor::VarLenAscii
        | TypeDescriptor::FixedAscii(_)
        | TypeDescriptor::FixedUnicode(_) => None,
        TypeDescriptor::Compound(_) => Some("compound"),
        TypeDescriptor::Enum(_) => Some("enum"),
        TypeDescriptor::FixedArray(..) | TypeDescriptor::VarLenArray(_) => Some("array"),
        _ => Some("unsupported"),
    }
}

/// Read an attribute as a [`Value`]. Datatypes without a text form
/// (compound, enum, reference, opaque, ...) come back as a `<kind>`
/// placeholder so the rest of the attribute map stays readable.
fn read_attr(attr: &Attribute) -> hdf5::Result<Value> {
    let label = match attr.dtype()?.to_descriptor() {
        Ok(desc) => match unreadable_label(&desc) {
            None => return read_attr_as(attr, desc),
            Some(label) => label,
        },
        Err(_) => "unsupported",
    };
    log::warn!("attribute {} has a {} datatype, shown as a placeholder", attr.name(), label);
    Ok(Value::Text(format!("<{}>", label)))
}

fn read_attr_as(attr: &Attribute, desc: TypeDescriptor) -> hdf5::Result<Value> {
    if attr.ndim() == 0 {
        by_type!(desc, scalar(attr))
    } else {
        by_type!(desc, array(attr))
    }
}

/// Overwrite an existing attribute, keeping its stored string class.
fn overwrite_attr(attr: &Attribute, value: &Value) -> Result<()> {
    match value {
        Value::Int(v) => attr.write_scalar(v)?,
        Value::UInt(v) => attr.write_scalar(v)?,
        Value::Float32(v) => attr.write_scalar(v)?,
        Value::Float(v) => attr.write_scalar(v)?,
        Value::Bool(v) => attr.write_scalar(v)?,
        Value::Text(text) => match attr.dtype()?.to_descriptor()? {
            TypeDescriptor::VarLenAscii => attr.write_scalar(&VarLenAscii::from_ascii(text)?)?,
            TypeDescriptor::FixedAscii(_) => {
                attr.write_scalar(&FixedAscii::<MAX_FIXED_STRING>::from_ascii(text)?)?
            }
            TypeDescriptor::FixedUnicode(_) => {
                attr.write_scalar(&FixedUnicode::<MAX_FIXED_STRING>::from_str(text)?)?
            }
            _ => attr.write_scalar(&VarLenUnicode::from_str(text)?)?,
        },
    }
    Ok(())
}

fn create_attr(loc: &Location, name: &str, value: &Value) -> Result<()> {
    match value {
        Value::Int(v) => loc.new_attr::<i64>().create(name)?.write_scalar(v)?,
        Value::UInt(v) => loc.new_attr::<u64>().create(name)?.write_scalar(v)?,
        Value::Float32(v) => loc.new_attr::<f32>().create(name)?.write_scalar(v)?,
        Value::Float(v) => loc.new_attr::<f64>().create(name)?.write_scalar(v)?,
        Value::Bool(v) => loc.new_attr::<bool>().create(name)?.write_scalar(v)?,
        Value::Text(text) => {
            let text = VarLenUnicode::from_str(text)?;
            loc.new_attr::<VarLenUnicode>()
                .create(name)?
                .write_scalar(&text)?
        }
    }
    Ok(())
}

/// An open HDF5 file.
pub struct Hdf5Container {
    file: File,
    location: PathBuf,
    mode: OpenMode,
}

impl Hdf5Container {
    pub fn open(path: &Path, mode: OpenMode) -> Result<Self> {
        let opened = match mode {
            OpenMode::Read => File::open(path),
            OpenMode::ReadWrite => File::open_rw(path),
        };
        let file = opened.map_err(|e| Error::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            file,
            location: path.to_path_buf(),
            mode,
        })
    }

    fn dataset(&self, path: &NodePath) -> Result<Dataset> {
        match self.kind(path)? {
            NodeKind::Dataset => Ok(self.file.dataset(path.as_str())?),
            NodeKind::Group => Err(Error::NotADataset(path.to_string())),
        }
    }

    /// Dataset at `path`, checked to have exactly `rank` dimensions.
    fn dataset_of_rank(&self, path: &NodePath, rank: usize) -> Result<Dataset> {
        let ds = self.dataset(path)?;
        if ds.ndim() != rank {
            return Err(Error::UnsupportedRank {
                path: path.to_string(),
                rank: ds.ndim(),
            });
        }
        Ok(ds)
    }

    fn with_location<R>(&self, path: &NodePath, f: impl FnOnce(&Location) -> Result<R>) -> Result<R> {
        match self.kind(path)? {
            NodeKind::Group => f(&self.file.group(path.as_str())?),
            NodeKind::Dataset => f(&self.file.dataset(path.as_str())?),
        }
    }
}

impl Container for Hdf5Container {
    fn location(&self) -> &Path {
        &self.location
    }

    fn mode(&self) -> OpenMode {
        self.mode
    }

    fn kind(&self, path: &NodePath) -> Result<NodeKind> {
        if path.is_root() {
            return Ok(NodeKind::Group);
        }
        match self.file.loc_type_by_name(path.as_str()) {
            Ok(LocationType::Group) => Ok(NodeKind::Group),
            Ok(LocationType::Dataset) => Ok(NodeKind::Dataset),
            Ok(other) => Err(Error::Backend(format!(
                "{} is a {:?}, not a group or dataset",
                path, other
            ))),
            Err(_) => Err(Error::NotFound(path.to_string())),
        }
    }

    fn children(&self, group: &NodePath) -> Result<Vec<(String, NodeKind)>> {
        if self.kind(group)? != NodeKind::Group {
            return Err(Error::NotAGroup(group.to_string()));
        }
        let handle = self.file.group(group.as_str())?;
        let mut children = Vec::new();
        for name in handle.member_names()? {
            match handle.loc_type_by_name(&name)? {
                LocationType::Group => children.push((name, NodeKind::Group)),
                LocationType::Dataset => children.push((name, NodeKind::Dataset)),
                other => log::debug!("skipping {} ({:?})", group.join(&name), other),
            }
        }
        Ok(children)
    }

    fn attributes(&self, path: &NodePath) -> Result<Vec<(String, Value)>> {
        self.with_location(path, |loc| {
            let mut attrs = Vec::new();
            for name in loc.attr_names()? {
                let value = read_attr(&loc.attr(&name)?)?;
                attrs.push((name, value));
            }
            Ok(attrs)
        })
    }

    fn attribute(&self, path: &NodePath, name: &str) -> Result<Option<Value>> {
        self.with_location(path, |loc| {
            if !loc.attr_names()?.iter().any(|n| n == name) {
                return Ok(None);
            }
            Ok(Some(read_attr(&loc.attr(name)?)?))
        })
    }

    fn set_attribute(&mut self, path: &NodePath, name: &str, value: &Value) -> Result<()> {
        if self.mode == OpenMode::Read {
            return Err(Error::ReadOnly(self.location.display().to_string()));
        }
        self.with_location(path, |loc| {
            if loc.attr_names()?.iter().any(|n| n == name) {
                overwrite_attr(&loc.attr(name)?, value)
            } else {
                create_attr(loc, name, value)
            }
        })
    }

    fn shape(&self, path: &NodePath) -> Result<Vec<usize>> {
        Ok(self.dataset(path)?.shape())
    }

    fn read_elements(&self, path: &NodePath, range: Range<usize>) -> Result<Vec<Value>> {
        let ds = self.dataset_of_rank(path, 1)?;
        let desc = ds.dtype()?.to_descriptor()?;
        Ok(by_type!(desc, elements(&ds, range))?)
    }

    fn read_rows(&self, path: &NodePath, range: Range<usize>) -> Result<Vec<Vec<Value>>> {
        let ds = self.dataset_of_rank(path, 2)?;
        let desc = ds.dtype()?.to_descriptor()?;
        Ok(by_type!(desc, rows(&ds, range))?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.file.flush()?)
    }
}

/// Opens files from disk with `hdf5-metno`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Hdf5Store;

impl Store for Hdf5Store {
    fn open(&self, path: &Path, mode: OpenMode) -> Result<Box<dyn Container>> {
        Ok(Box::new(Hdf5Container::open(path, mode)?))
    }
}
