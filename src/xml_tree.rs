use std::io::Read;
use std::path::Path;

use xml::attribute::OwnedAttribute;
use xml::reader::{EventReader, XmlEvent};

use super::config_utils;
use super::InputError;


/// A read-only element tree materialized from an xml event stream. Namespaces are dropped and
/// elements are matched on their local name only.
#[derive(PartialEq, Debug, Clone)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<OwnedAttribute>,
    text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn from_path(path: &Path) -> Result<XmlElement, InputError> {
        let parser = config_utils::xml_parser_from_path(path)?;
        Self::from_parser(parser)
    }

    pub fn from_xml_str(xml: &str) -> Result<XmlElement, InputError> {
        Self::from_reader(xml.as_bytes())
    }

    pub fn from_reader<R: Read>(source: R) -> Result<XmlElement, InputError> {
        Self::from_parser(EventReader::new(source))
    }

    fn from_parser<R: Read>(mut parser: EventReader<R>) -> Result<XmlElement, InputError> {
        let mut open_elements: Vec<XmlElement> = vec![];
        let mut root = None;
        loop { match parser.next()? {
            XmlEvent::EndDocument => {
                log::debug!("Reached end of xml document");
                break;
            }
            XmlEvent::StartElement {name, attributes, ..} => {
                open_elements.push(XmlElement {
                    name: name.local_name,
                    attributes,
                    text: String::new(),
                    children: vec![],
                });
            }
            XmlEvent::EndElement {..} => {
                // the reader rejects unbalanced documents, so there is always an open element
                if let Some(element) = open_elements.pop() {
                    match open_elements.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
            }
            XmlEvent::Characters(content) | XmlEvent::CData(content) => {
                if let Some(element) = open_elements.last_mut() {
                    element.text.push_str(&content);
                }
            }
            _ => {}
        }}

        root.ok_or_else(|| InputError::MissingElement {
            parent: String::from("document"),
            element: String::from("root"),
        })
    }

    /// The element's character content with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn attribute(&self, attr_name: &str) -> Option<&str> {
        config_utils::get_xml_attribute_value(&self.attributes, attr_name)
    }

    pub fn required_attribute(&self, attr_name: &str) -> Result<&str, InputError> {
        self.attribute(attr_name).ok_or_else(|| InputError::MissingAttribute {
            element: self.name.clone(),
            attribute: String::from(attr_name),
        })
    }

    pub fn child(&self, child_name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|cc| cc.name == child_name)
    }

    pub fn required_child(&self, child_name: &str) -> Result<&XmlElement, InputError> {
        self.child(child_name).ok_or_else(|| InputError::MissingElement {
            parent: self.name.clone(),
            element: String::from(child_name),
        })
    }

    pub fn children_named<'a>(&'a self, child_name: &'a str)
                              -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |cc| cc.name == child_name)
    }

    /// Text of the named child, if the child exists and its text is not blank.
    pub fn child_text(&self, child_name: &str) -> Option<&str> {
        self.child(child_name).map(|cc| cc.text()).filter(|tt| !tt.is_empty())
    }

    /// Depth-first search for the first element with the given name, starting with self.
    pub fn find_descendant(&self, name: &str) -> Option<&XmlElement> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|cc| cc.find_descendant(name))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    static TEST_XML: &str = r###"
    <PLANit xmlns:gml="http://www.opengis.net/gml">
      <macroscopicnetwork>
        <modes>
          <mode id="car"><name>Car</name><pcu> 1.0 </pcu></mode>
        </modes>
      </macroscopicnetwork>
      <macroscopiczoning>
        <zones>
          <zone id="A"/>
          <zone id="B"><name>   </name></zone>
        </zones>
      </macroscopiczoning>
    </PLANit>
    "###;

    #[test]
    fn test_tree_building() {
        let root = XmlElement::from_xml_str(TEST_XML).unwrap();
        assert_eq!(root.name, "PLANit");
        assert_eq!(root.children.len(), 2);

        let mode = root.find_descendant("mode").unwrap();
        assert_eq!(mode.attribute("id"), Some("car"));
        assert_eq!(mode.child_text("pcu"), Some("1.0"));
        assert_eq!(mode.child_text("name"), Some("Car"));

        let zones = root.find_descendant("zones").unwrap();
        let ids: Vec<&str> = zones.children_named("zone")
                                  .map(|zz| zz.required_attribute("id").unwrap())
                                  .collect();
        assert_eq!(ids, vec!["A", "B"]);
        // blank text counts as absent
        assert_eq!(zones.children[1].child_text("name"), None);
    }

    #[test]
    fn test_missing_parts() {
        let root = XmlElement::from_xml_str(TEST_XML).unwrap();
        let mode = root.find_descendant("mode").unwrap();
        assert!(matches!(mode.required_attribute("predefined"),
                         Err(InputError::MissingAttribute { .. })));
        assert!(matches!(root.required_child("macroscopicdemand"),
                         Err(InputError::MissingElement { .. })));
        assert!(root.find_descendant("oddemands").is_none());
    }

    #[test]
    fn test_malformed_xml() {
        let result = XmlElement::from_xml_str("<zones><zone id=\"1\"></zones>");
        assert!(matches!(result, Err(InputError::Xml(_))));
    }
}
