mod draw;

use std::collections::{BTreeMap, HashMap, HashSet};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref};

use crate::assets::{Asset, AssetId, AssetStore, ImageFormat};
use crate::error::Error;
use crate::fonts::{FaceKey, FontLibrary, PdfFont, register_pdf_font};
use crate::layout::DrawOp;
use crate::render::RenderedDocument;

use draw::{PX_TO_PT, PdfImage, draw_page};

fn embed_image(pdf: &mut Pdf, xobj_ref: Ref, asset: &Asset, alloc: &mut impl FnMut() -> Ref) -> Option<(u32, u32)> {
    match asset.format {
        ImageFormat::Jpeg => {
            let mut xobj = pdf.image_xobject(xobj_ref, &asset.data);
            xobj.filter(Filter::DctDecode);
            xobj.width(asset.pixel_width as i32);
            xobj.height(asset.pixel_height as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            Some((asset.pixel_width, asset.pixel_height))
        }
        ImageFormat::Png => {
            let cursor = std::io::Cursor::new(asset.data.as_slice());
            let reader = image::ImageReader::with_format(cursor, image::ImageFormat::Png);
            let decoded = match reader.decode() {
                Ok(d) => d,
                Err(e) => {
                    log::warn!("Cannot decode {}: {e}", asset.source.display());
                    return None;
                }
            };
            let rgba: image::RgbaImage = decoded.to_rgba8();
            let (w, h) = (rgba.width(), rgba.height());
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

            let rgb_data: Vec<u8> = rgba
                .pixels()
                .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                .collect();
            let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

            let smask_ref = if has_alpha {
                let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w as i32);
                mask.height(h as i32);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                Some(mask_ref)
            } else {
                None
            };

            let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
            Some((w, h))
        }
    }
}

/// Serialize the displayed pages as a PDF, one A4 page each.
pub fn write(doc: &RenderedDocument, fonts: &FontLibrary, assets: &AssetStore) -> Result<Vec<u8>, Error> {
    if doc.pages.is_empty() {
        return Err(Error::Pdf("document has no pages".into()));
    }
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    // Phase 1: faces and the characters drawn with each. Requested keys that resolve to
    // the same face share one PDF font.
    let mut requested: BTreeMap<FaceKey, FaceKey> = BTreeMap::new();
    let mut used: BTreeMap<FaceKey, HashSet<char>> = BTreeMap::new();
    let mut image_ids: Vec<AssetId> = Vec::new();
    for op in doc.pages.iter().flat_map(|p| p.ops.iter()) {
        match op {
            DrawOp::Text { text, face, .. } => {
                let resolved = requested
                    .entry(face.clone())
                    .or_insert_with(|| fonts.face_by_key(face).key().clone())
                    .clone();
                used.entry(resolved).or_default().extend(text.chars());
            }
            DrawOp::Image { asset, .. } if !image_ids.contains(asset) => image_ids.push(*asset),
            _ => {}
        }
    }

    let mut embedded: HashMap<FaceKey, PdfFont> = HashMap::new();
    for (i, (key, chars)) in used.iter().enumerate() {
        let face = fonts.face_by_key(key);
        let font = register_pdf_font(&mut pdf, &face, format!("F{}", i + 1), &mut alloc, chars);
        embedded.insert(key.clone(), font);
    }
    let mut pdf_fonts: HashMap<FaceKey, PdfFont> = HashMap::new();
    for (req, resolved) in &requested {
        if let Some(font) = embedded.get(resolved) {
            pdf_fonts.insert(req.clone(), font.clone());
        }
    }
    let t_fonts = t0.elapsed();

    // Phase 2: images
    let mut images: HashMap<AssetId, PdfImage> = HashMap::new();
    let mut image_xobjects: Vec<(String, Ref)> = Vec::new();
    for id in image_ids {
        let Some(asset) = assets.get(id) else {
            log::warn!("{id} was released before export, skipping");
            continue;
        };
        let xobj_ref = alloc();
        if let Some((pixel_width, pixel_height)) = embed_image(&mut pdf, xobj_ref, asset, &mut alloc) {
            let pdf_name = format!("Im{}", image_xobjects.len() + 1);
            image_xobjects.push((pdf_name.clone(), xobj_ref));
            images.insert(
                id,
                PdfImage {
                    pdf_name,
                    pixel_width,
                    pixel_height,
                },
            );
        }
    }
    let t_images = t0.elapsed();

    // Phase 3: pages
    let n = doc.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in doc.pages.iter().enumerate() {
        let mut content = Content::new();
        draw_page(&mut content, page, &pdf_fonts, &images);
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let mut font_pairs: Vec<(&String, Ref)> = embedded
        .values()
        .map(|f| (&f.pdf_name, f.font_ref))
        .collect();
    font_pairs.sort_by(|a, b| a.0.cmp(b.0));

    for (i, page) in doc.pages.iter().enumerate() {
        let mut pdf_page = pdf.page(page_ids[i]);
        pdf_page
            .media_box(Rect::new(
                0.0,
                0.0,
                page.width * PX_TO_PT,
                page.height * PX_TO_PT,
            ))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = pdf_page.resources();
        {
            let mut fonts = resources.fonts();
            for (name, font_ref) in &font_pairs {
                fonts.pair(Name(name.as_bytes()), *font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    let t_pages = t0.elapsed();
    log::info!(
        "PDF phases: font_embed={:.1}ms, images={:.1}ms, pages={:.1}ms ({} pages)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_images - t_fonts).as_secs_f64() * 1000.0,
        (t_pages - t_images).as_secs_f64() * 1000.0,
        n,
    );

    Ok(pdf.finish())
}
