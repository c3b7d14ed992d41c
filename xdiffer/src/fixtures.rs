//! Demo documents for exercising the comparison engine.
//!
//! A travel-profile record and a modified variant of it with attributes
//! added, elements removed and added, text changed and the whole document
//! reformatted.

/// The original travel profile.
pub const DEMO_XML_1: &str = r#"<?xml version="1.0"?>
<Profile>
    <Customer>
        <PersonName NameType="Default">
            <NameTitle>Mr.</NameTitle>
            <GivenName>George</GivenName>
            <MiddleName>A.</MiddleName>
            <SurName>Smith</SurName>
            <Bio>A skilled engineer with a passion for solving complex problems through innovative
                design and efficient solutions. With expertise in software development, mechanical
                engineering, he has worked on projects ranging from nuclear reactor to spaceship.
                Always eager to learn and adapt, he thrives in collaborative environments,
                leveraging technical knowledge to drive impactful results.</Bio>
        </PersonName>
        <TelephoneInfo PhoneTech="Voice" PhoneUse="Work">
            <Telephone>
                <AreaCityCode>206</AreaCityCode>
                <PhoneNumber>813-8698</PhoneNumber>
            </Telephone>
        </TelephoneInfo>
        <PaymentForm>
            ...
        </PaymentForm>
        <Address>
            <StreetNmbr POBox="4321-01">From hell</StreetNmbr>
            <BldgRoom>Suite 800</BldgRoom>
            <CityName>Seattle</CityName>
            <StateProv PostalCode="98108">WA</StateProv>
            <CountryName>USA</CountryName>
        </Address>
        <Address>
            <StreetNmbr POBox="4321-01">1200 Yakima St</StreetNmbr>
            <BldgRoom>Suite 800</BldgRoom>
            <CityName>Seattle</CityName>
            <StateProv PostalCode="98108">WA</StateProv>
            <CountryName>USA</CountryName>
        </Address>
    </Customer>
</Profile>"#;

/// The modified travel profile.
pub const DEMO_XML_2: &str = r#"<?xml version="1.0"?>
<Profile>
 <Customer>
  <PersonName NameType="Default" Foo="foobar">
   <NameTitle>Mr.</NameTitle>
   <GivenName Attr="cool">
	Fred
   </GivenName>
   <MiddleName>A.</MiddleName>
   <SurName>Smith</SurName>
   <NewStuff>Smurf</NewStuff>
  </PersonName>
  <TelephoneInfo PhoneTech="Voice" PhoneUse="Work" >
   <Telephone>       <AreaCityCode>206</AreaCityCode>
	<PhoneNumber>
   813-8698
   </PhoneNumber>
   </Telephone>
  </TelephoneInfo>
  <PaymentForm>
   ...
  </PaymentForm>
  <Address>
   <StreetNmbr POBox="4321-01">1200 Yakima St</StreetNmbr>
   <BldgRoom>Suite 800</BldgRoom>
   <CityName>Seattle</CityName>
   <StateProv PostalCode="98108">WA</StateProv>
   <CountryName>USA</CountryName>
   <Planet>Earth</Planet>
  </Address>
  <RelatedTraveler Relation="Child">
   <PersonName>
	<GivenName>Devin</GivenName>
	<MiddleName>R.</MiddleName>
	<SurName>Smith</SurName>
   </PersonName>
  </RelatedTraveler>
  <RelatedTraveler Relation="Child">
   <PersonName>
	<GivenName>Amy</GivenName>
	<MiddleName>E.</MiddleName>
	<SurName>Smith</SurName>
   </PersonName>
  </RelatedTraveler>
  <RelatedTraveler Relation="Child">
   <PersonName>
	<GivenName>Alfred</GivenName>
	<MiddleName>E.</MiddleName>
	<SurName>Newman</SurName>
   </PersonName>
  </RelatedTraveler>
 </Customer>
</Profile>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff_tree::{build_diff_tree, DiffTreeKind};
    use crate::tree::{XNodeName, XTree};
    use quick_xml::events::Event;
    use quick_xml::Reader;

    fn assert_well_formed(xml: &str) {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("fixture is not well-formed: {}", e),
            }
        }
    }

    #[test]
    fn test_fixtures_are_well_formed() {
        assert_well_formed(DEMO_XML_1);
        assert_well_formed(DEMO_XML_2);
    }

    #[test]
    fn test_fixtures_parse_into_profiles() {
        for xml in [DEMO_XML_1, DEMO_XML_2] {
            let tree = XTree::parse(xml).unwrap();
            assert_eq!(tree.root().name(), XNodeName::TagName("Profile"));
        }
    }

    #[test]
    fn test_fixtures_differ_partially() {
        let tree = build_diff_tree(DEMO_XML_1, DEMO_XML_2).unwrap();
        assert_eq!(tree.kind(), DiffTreeKind::PartialDiff);
        assert!(tree.diff_count() > 0);
    }

    #[test]
    fn test_fixture_is_same_as_itself() {
        let tree = build_diff_tree(DEMO_XML_2, DEMO_XML_2).unwrap();
        assert_eq!(tree.kind(), DiffTreeKind::Same);
    }
}
