// ============================================
// VHG Writer - XML контейнер HyperTreeGrid
// ============================================
//
// Порядок элементов:
// HyperTreeGrid (атрибуты решётки)
//   Coordinates: XCoordinates, YCoordinates, ZCoordinates
//   Topology: MaterialMaskIndex (если есть), Descriptor
//   PointData: массивы атрибутов как есть
//   FieldData: атрибуты решётки целиком
//
// Дескриптор и атрибуты решётки строятся ДО записи: при ошибке файл не создаётся.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::WriterConfig;
use crate::error::{WriteError, WriteResult};
use crate::grid::{Axis, FieldArray, TreeSource};
use crate::topology::Descriptor;

use super::encode_with;

pub const DATA_SET_NAME: &str = "HyperTreeGrid";
pub const DEFAULT_EXTENSION: &str = "vhg";

const AXIS_ARRAYS: [&str; 3] = ["XCoordinates", "YCoordinates", "ZCoordinates"];

pub struct VhgWriter {
    config: WriterConfig,
}

impl VhgWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Записать решётку в файл
    pub fn write<G: TreeSource + Sync>(&self, grid: &G, path: impl AsRef<Path>) -> WriteResult<Descriptor> {
        let descriptor = encode_with(&self.config, grid)?;
        let element = primary_element(grid)?;

        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_document(grid, element, &descriptor, &mut writer)?;
        writer.flush()?;

        log::info!("Wrote {} ({} descriptor bits)", path.display(), descriptor.len());
        Ok(descriptor)
    }

    /// Записать решётку в произвольный поток
    pub fn write_to<G: TreeSource + Sync, W: Write>(&self, grid: &G, sink: W) -> WriteResult<Descriptor> {
        let descriptor = encode_with(&self.config, grid)?;
        let element = primary_element(grid)?;
        self.write_document(grid, element, &descriptor, sink)?;
        Ok(descriptor)
    }

    fn write_document<G: TreeSource, W: Write>(
        &self,
        grid: &G,
        element: BytesStart<'static>,
        descriptor: &Descriptor,
        sink: W,
    ) -> WriteResult<()> {
        let mut xml = Writer::new_with_indent(sink, b' ', self.config.indent);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;

        let mut file = BytesStart::new("VTKFile");
        file.push_attribute(("type", DATA_SET_NAME));
        file.push_attribute(("version", "1.0"));
        file.push_attribute(("byte_order", "LittleEndian"));
        xml.write_event(Event::Start(file))?;

        xml.write_event(Event::Start(element))?;
        write_coordinates(&mut xml, grid)?;
        write_topology(&mut xml, grid, descriptor)?;
        write_arrays(&mut xml, "PointData", grid.point_data())?;
        write_arrays(&mut xml, "FieldData", grid.field_data())?;
        xml.write_event(Event::End(BytesEnd::new(DATA_SET_NAME)))?;

        xml.write_event(Event::End(BytesEnd::new("VTKFile")))?;
        Ok(())
    }
}

/// Атрибуты элемента HyperTreeGrid
fn primary_element<G: TreeSource>(grid: &G) -> WriteResult<BytesStart<'static>> {
    // Начало и шаг решётки по первой ячейке каждой оси
    let mut origin = [0.0; 3];
    let mut scale = [0.0; 3];
    for axis in Axis::ALL {
        let coords = grid.coordinates(axis);
        let (first, second) = match coords {
            [first, second, ..] => (*first, *second),
            _ => return Err(WriteError::MissingCoordinates { axis }),
        };
        origin[axis.index()] = first;
        scale[axis.index()] = second - first;
    }

    let mut element = BytesStart::new(DATA_SET_NAME);
    element.push_attribute(("Dimension", grid.dimension().to_string().as_str()));
    element.push_attribute(("BranchFactor", grid.branch_factor().to_string().as_str()));
    let transposed = if grid.transposed_root_indexing() { "1" } else { "0" };
    element.push_attribute(("TransposedRootIndexing", transposed));
    element.push_attribute(("GridSize", join(grid.grid_size().iter()).as_str()));
    element.push_attribute(("GridOrigin", join(origin.iter()).as_str()));
    element.push_attribute(("GridScale", join(scale.iter()).as_str()));
    Ok(element)
}

fn write_coordinates<G: TreeSource, W: Write>(xml: &mut Writer<W>, grid: &G) -> WriteResult<()> {
    xml.write_event(Event::Start(BytesStart::new("Coordinates")))?;
    for axis in Axis::ALL {
        let coords = grid.coordinates(axis);
        write_inline_array(xml, AXIS_ARRAYS[axis.index()], "Float64", 1, coords.len(), &join(coords.iter()))?;
    }
    xml.write_event(Event::End(BytesEnd::new("Coordinates")))?;
    Ok(())
}

fn write_topology<G: TreeSource, W: Write>(
    xml: &mut Writer<W>,
    grid: &G,
    descriptor: &Descriptor,
) -> WriteResult<()> {
    xml.write_event(Event::Start(BytesStart::new("Topology")))?;

    if let Some(mask) = grid.material_mask_index() {
        write_inline_array(xml, "MaterialMaskIndex", "Int64", 1, mask.len(), &join(mask.iter()))?;
    }

    let bits = descriptor.iter().map(|bit| if bit { "1" } else { "0" });
    write_inline_array(xml, "Descriptor", "Bit", 1, descriptor.len(), &join(bits))?;

    xml.write_event(Event::End(BytesEnd::new("Topology")))?;
    Ok(())
}

/// Секция атрибутов (PointData / FieldData), пишется даже пустой
fn write_arrays<W: Write>(xml: &mut Writer<W>, section: &str, arrays: &[FieldArray]) -> WriteResult<()> {
    xml.write_event(Event::Start(BytesStart::new(section)))?;
    for array in arrays {
        write_inline_array(
            xml,
            &array.name,
            "Float64",
            array.number_of_components,
            array.tuple_count(),
            &join(array.values.iter()),
        )?;
    }
    xml.write_event(Event::End(BytesEnd::new(section)))?;
    Ok(())
}

/// DataArray с данными в теле элемента (format="ascii")
fn write_inline_array<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    vtk_type: &str,
    components: usize,
    tuples: usize,
    values: &str,
) -> WriteResult<()> {
    let mut element = BytesStart::new("DataArray");
    element.push_attribute(("type", vtk_type));
    element.push_attribute(("Name", name));
    if components > 1 {
        element.push_attribute(("NumberOfComponents", components.to_string().as_str()));
    }
    element.push_attribute(("NumberOfTuples", tuples.to_string().as_str()));
    element.push_attribute(("format", "ascii"));

    xml.write_event(Event::Start(element))?;
    xml.write_event(Event::Text(BytesText::new(values)))?;
    xml.write_event(Event::End(BytesEnd::new("DataArray")))?;
    Ok(())
}

fn join<T: Display>(values: impl Iterator<Item = T>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
}
