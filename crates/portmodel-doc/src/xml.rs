//! Reader for the uops.info `instructions.xml` layout.
//!
//! ```xml
//! <instruction asm="ADD">
//!   <operand idx="1" type="reg">RAX,RBX,RCX</operand>
//!   <operand idx="3" type="reg" suppressed="1">RFLAGS</operand>
//!   <architecture name="SKL">
//!     <measurement port0156="1">
//!       <latency start_op="1" target_op="1" cycles="1"/>
//!     </measurement>
//!     <IACA version="2.3" port0156="1"/>
//!   </architecture>
//! </instruction>
//! ```

use roxmltree::Node;

use crate::error::{DocumentError, Result};
use crate::model::{
    AnalyzerRecord, ArchitectureBlock, Attributes, Document, Instruction, LatencySample,
    Measurement, Operand,
};

const INSTRUCTION: &str = "instruction";
const OPERAND: &str = "operand";
const ARCHITECTURE: &str = "architecture";
const MEASUREMENT: &str = "measurement";
const ANALYZER: &str = "IACA";
const LATENCY: &str = "latency";

/// Parse a document from XML text.
pub fn parse_xml(text: &str) -> Result<Document> {
    let xml = roxmltree::Document::parse(text)?;
    let instructions = xml
        .descendants()
        .filter(|n| is_element(n, INSTRUCTION))
        .map(|n| read_instruction(&xml, n))
        .collect::<Result<Vec<_>>>()?;
    log::debug!("read {} instruction(s) from XML", instructions.len());
    Ok(Document { instructions })
}

fn is_element(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn line_of(xml: &roxmltree::Document<'_>, node: Node<'_, '_>) -> u32 {
    xml.text_pos_at(node.range().start).row
}

fn required<'a>(
    xml: &roxmltree::Document<'_>,
    node: Node<'a, '_>,
    attribute: &str,
) -> Result<&'a str> {
    node.attribute(attribute)
        .ok_or_else(|| DocumentError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute: attribute.to_string(),
            line: line_of(xml, node),
        })
}

fn integer(
    xml: &roxmltree::Document<'_>,
    node: Node<'_, '_>,
    attribute: &str,
    value: &str,
) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| DocumentError::InvalidInteger {
            element: node.tag_name().name().to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
            line: line_of(xml, node),
        })
}

fn attributes(node: Node<'_, '_>) -> Attributes {
    node.attributes()
        .map(|a| (a.name().to_string(), a.value().to_string()))
        .collect()
}

fn read_instruction(xml: &roxmltree::Document<'_>, node: Node<'_, '_>) -> Result<Instruction> {
    let asm = required(xml, node, "asm")?.to_string();

    let mut operands = Vec::new();
    let mut architectures = Vec::new();
    for child in node.children() {
        if is_element(&child, OPERAND) {
            operands.push(read_operand(xml, child)?);
        } else if is_element(&child, ARCHITECTURE) {
            architectures.push(read_architecture(xml, child)?);
        }
    }

    Ok(Instruction {
        asm,
        operands,
        architectures,
    })
}

fn read_operand(xml: &roxmltree::Document<'_>, node: Node<'_, '_>) -> Result<Operand> {
    let idx_text = required(xml, node, "idx")?;
    let idx = integer(xml, node, "idx", idx_text)?;
    let type_tag = required(xml, node, "type")?.to_string();
    let suppressed = match node.attribute("suppressed") {
        Some(value) => integer(xml, node, "suppressed", value)? != 0,
        None => false,
    };
    Ok(Operand {
        idx,
        type_tag,
        text: node.text().unwrap_or_default().to_string(),
        suppressed,
    })
}

fn read_architecture(
    xml: &roxmltree::Document<'_>,
    node: Node<'_, '_>,
) -> Result<ArchitectureBlock> {
    let name = required(xml, node, "name")?.to_string();

    let mut measurements = Vec::new();
    let mut analyzer_records = Vec::new();
    for desc in node.descendants() {
        if is_element(&desc, MEASUREMENT) {
            measurements.push(read_measurement(xml, desc)?);
        } else if is_element(&desc, ANALYZER) {
            let version = required(xml, desc, "version")?.parse()?;
            analyzer_records.push(AnalyzerRecord {
                version,
                attributes: attributes(desc),
            });
        }
    }

    Ok(ArchitectureBlock {
        name,
        measurements,
        analyzer_records,
    })
}

fn read_measurement(xml: &roxmltree::Document<'_>, node: Node<'_, '_>) -> Result<Measurement> {
    let latencies = node
        .descendants()
        .filter(|n| is_element(n, LATENCY))
        .map(|n| read_latency(xml, n))
        .collect::<Result<Vec<_>>>()?;
    Ok(Measurement {
        attributes: attributes(node),
        latencies,
    })
}

fn read_latency(xml: &roxmltree::Document<'_>, node: Node<'_, '_>) -> Result<LatencySample> {
    let mut sample = LatencySample::default();
    for attr in node.attributes() {
        match attr.name() {
            "start_op" => sample.start_op = Some(attr.value().to_string()),
            "target_op" => sample.target_op = Some(attr.value().to_string()),
            "cycles" => sample.cycles = Some(integer(xml, node, "cycles", attr.value())?),
            other => {
                sample.extra.insert(other.to_string(), attr.value().to_string());
            }
        }
    }
    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<root>
  <extension name="BASE">
    <instruction asm="ADD" category="BINARY">
      <operand idx="2" type="reg">RAX,RBX,RCX</operand>
      <operand idx="1" type="reg" r="1" w="1">RAX,RBX,RCX</operand>
      <operand idx="3" type="reg" suppressed="1">RFLAGS</operand>
      <architecture name="SKL">
        <measurement port0156="1" TP="0.25" uops="1">
          <latency start_op="1" target_op="1" cycles="1"/>
          <latency start_op="2" target_op="1" cycles="1"/>
        </measurement>
        <IACA version="2.3" port0156="1"/>
        <IACA version="2.1" port0156="1"/>
      </architecture>
      <architecture name="ZEN">
        <measurement port0123="1"/>
      </architecture>
    </instruction>
    <instruction asm="DIV">
      <operand idx="1" type="reg">RCX</operand>
      <architecture name="HSW">
        <measurement port0="10" div_cycles="21">
          <latency start_op="1" target_op="2" min_cycles="35" upper_bound="1"/>
        </measurement>
      </architecture>
    </instruction>
  </extension>
</root>"#;

    #[test]
    fn reads_instructions_and_blocks() {
        let doc = parse_xml(SAMPLE).unwrap();
        assert_eq!(doc.instructions.len(), 2);

        let add = &doc.instructions[0];
        assert_eq!(add.asm, "ADD");
        assert_eq!(add.operands.len(), 3);
        assert_eq!(add.operands[0].idx, 2);
        assert_eq!(add.operands[1].text, "RAX,RBX,RCX");
        assert!(add.operands[2].suppressed);
        assert!(!add.operands[0].suppressed);

        let skl = add.architecture("SKL").unwrap();
        assert_eq!(skl.measurements.len(), 1);
        assert_eq!(skl.measurements[0].attributes["port0156"], "1");
        assert_eq!(skl.measurements[0].latencies.len(), 2);
        assert_eq!(skl.measurements[0].latencies[0].cycles, Some(1));
        assert_eq!(skl.analyzer_records.len(), 2);
        assert_eq!(skl.analyzer_records[0].version.as_str(), "2.3");
        // version is also kept among the attributes
        assert_eq!(skl.analyzer_records[1].attributes["version"], "2.1");
    }

    #[test]
    fn latency_without_cycles_keeps_other_attributes() {
        let doc = parse_xml(SAMPLE).unwrap();
        let div = doc.instructions[1].architecture("HSW").unwrap();
        let sample = &div.measurements[0].latencies[0];
        assert_eq!(sample.cycles, None);
        assert_eq!(sample.start_op.as_deref(), Some("1"));
        assert_eq!(sample.extra["min_cycles"], "35");
    }

    #[test]
    fn architectures_listed() {
        let doc = parse_xml(SAMPLE).unwrap();
        let archs: Vec<_> = doc.architectures().into_iter().collect();
        assert_eq!(archs, ["HSW", "SKL", "ZEN"]);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(matches!(
            parse_xml("<root><instruction asm=\"ADD\"></root>").unwrap_err(),
            DocumentError::Xml(_)
        ));
    }

    #[test]
    fn missing_asm_is_reported_with_line() {
        let err = parse_xml("<root>\n<instruction/>\n</root>").unwrap_err();
        match err {
            DocumentError::MissingAttribute {
                element,
                attribute,
                line,
            } => {
                assert_eq!(element, "instruction");
                assert_eq!(attribute, "asm");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_index_is_rejected() {
        let text = r#"<root><instruction asm="NOP"><operand idx="x" type="imm"/></instruction></root>"#;
        assert!(matches!(
            parse_xml(text).unwrap_err(),
            DocumentError::InvalidInteger { ref attribute, .. } if attribute == "idx"
        ));
    }

    #[test]
    fn bad_tool_version_is_rejected() {
        let text = r#"<root><instruction asm="NOP">
            <architecture name="SKL"><IACA version="two" port0="1"/></architecture>
        </instruction></root>"#;
        assert!(matches!(
            parse_xml(text).unwrap_err(),
            DocumentError::InvalidVersion(_)
        ));
    }
}
