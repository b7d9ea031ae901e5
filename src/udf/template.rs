//! Fixed UDF boilerplate.
//!
//! The consuming application expects these sections byte for byte; only
//! the `content` text and the `elements` list vary between documents.

/// Name of the XML entry inside the UDF zip archive.
pub const CONTENT_ENTRY: &str = "content.xml";

/// UDF format version written to `<template format_id>`.
pub const FORMAT_ID: &str = "1.8";

/// Resolver name written to `<elements resolver>`.
pub const ELEMENTS_RESOLVER: &str = "hvl-default";

/// Everything before the CDATA content.
pub const HEAD: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<template format_id=\"1.8\">\n<content><![CDATA[";

/// Between the CDATA content and the element list.
pub const AFTER_CONTENT: &str = "]]></content>\n<properties><pageFormat mediaSizeName=\"1\" leftMargin=\"42.51968479156494\" rightMargin=\"28.34645652770996\" topMargin=\"14.17322826385498\" bottomMargin=\"14.17322826385498\" paperOrientation=\"1\" headerFOffset=\"20.0\" footerFOffset=\"20.0\" /></properties>\n<elements resolver=\"hvl-default\">\n";

/// Everything after the element list.
pub const TAIL: &str = "\n</elements>\n<styles><style name=\"default\" description=\"Geçerli\" family=\"Dialog\" size=\"12\" bold=\"false\" italic=\"false\" foreground=\"-13421773\" FONT_ATTRIBUTE_KEY=\"javax.swing.plaf.FontUIResource[family=Dialog,name=Dialog,style=plain,size=12]\" /><style name=\"hvl-default\" family=\"Times New Roman\" size=\"12\" description=\"Gövde\" /></styles>\n</template>";
