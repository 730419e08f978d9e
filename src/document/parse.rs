//! Structural mapping from `nfeProc` XML to [`Document`].
//!
//! The mapping performs strict type conversions only. Any missing mandatory
//! element or failed conversion aborts with `MalformedDocument`, naming the
//! element path, and no partial document is returned.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{
    derive_access_key,
    xml::{Cofins, ContributionGroup, Det, Emit, Icms, NfeProc, Pis},
    Document, Issuer, LineItem, Payment, TaxDetail, TaxKind,
};
use crate::error::{ImportError, ImportResult};

/// Parse one fiscal document from raw XML bytes.
pub fn parse_document(bytes: &[u8]) -> ImportResult<Document> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ImportError::malformed(format!("document is not valid UTF-8: {}", e)))?;

    let proc: NfeProc = quick_xml::de::from_str(text)
        .map_err(|e| ImportError::malformed(format!("unexpected document structure: {}", e)))?;

    let inf = proc.nfe.inf_nfe;
    let access_key = derive_access_key(&inf.id)?;

    let number = parse_int("ide/nNF", &inf.ide.n_nf)?;
    let series = parse_int("ide/serie", &inf.ide.serie)?;
    let issue_date = parse_timestamp("ide/dhEmi", &inf.ide.dh_emi)?;

    let total_value = parse_decimal("total/ICMSTot/vProd", &inf.total.icms_tot.v_prod)?;

    let line_items = inf
        .det
        .iter()
        .enumerate()
        .map(|(idx, det)| map_line_item(idx + 1, det))
        .collect::<ImportResult<Vec<_>>>()?;

    let payments = inf
        .pag
        .det_pag
        .iter()
        .enumerate()
        .map(|(idx, det_pag)| {
            let path = format!("pag/detPag[{}]", idx + 1);
            Ok(Payment {
                method: det_pag.t_pag.trim().to_string(),
                amount: parse_decimal(&format!("{}/vPag", path), &det_pag.v_pag)?,
            })
        })
        .collect::<ImportResult<Vec<_>>>()?;

    Ok(Document {
        access_key,
        number,
        series,
        issue_date,
        total_value,
        issuer: map_issuer(&inf.emit),
        line_items,
        payments,
    })
}

fn map_issuer(emit: &Emit) -> Issuer {
    let addr = &emit.ender_emit;
    Issuer {
        tax_id: emit.cnpj.trim().to_string(),
        name: emit.x_nome.trim().to_string(),
        address: format!(
            "{}, {}, {}, {}-{}",
            addr.x_lgr.trim(),
            addr.nro.trim(),
            addr.x_bairro.trim(),
            addr.x_mun.trim(),
            addr.uf.trim()
        ),
    }
}

fn map_line_item(position: usize, det: &Det) -> ImportResult<LineItem> {
    let path = format!("det[{}]", position);
    let prod = &det.prod;

    let mut taxes = Vec::new();
    if let Some(imposto) = &det.imposto {
        if let Some(pis) = &imposto.pis {
            taxes.extend(map_pis(&path, pis)?);
        }
        if let Some(cofins) = &imposto.cofins {
            taxes.extend(map_cofins(&path, cofins)?);
        }
        if let Some(icms) = &imposto.icms {
            taxes.extend(map_icms(&path, icms)?);
        }
    }

    Ok(LineItem {
        code: prod.c_prod.trim().to_string(),
        description: prod.x_prod.trim().to_string(),
        quantity: parse_decimal(&format!("{}/prod/qCom", path), &prod.q_com)?,
        unit_value: parse_decimal(&format!("{}/prod/vUnCom", path), &prod.v_un_com)?,
        total_value: parse_decimal(&format!("{}/prod/vProd", path), &prod.v_prod)?,
        taxes,
    })
}

fn map_pis(path: &str, pis: &Pis) -> ImportResult<Option<TaxDetail>> {
    let group = [("PISAliq", &pis.aliq), ("PISOutr", &pis.outr), ("PISNT", &pis.nt)]
        .into_iter()
        .find_map(|(name, group)| group.as_ref().map(|g| (name, g)));

    let Some((name, g)) = group else {
        log::debug!("{}/imposto/PIS carries no recognized variant, skipping", path);
        return Ok(None);
    };
    map_contribution(TaxKind::Pis, &format!("{}/imposto/PIS/{}", path, name), g).map(Some)
}

fn map_cofins(path: &str, cofins: &Cofins) -> ImportResult<Option<TaxDetail>> {
    let group = [
        ("COFINSAliq", &cofins.aliq),
        ("COFINSOutr", &cofins.outr),
        ("COFINSNT", &cofins.nt),
    ]
    .into_iter()
    .find_map(|(name, group)| group.as_ref().map(|g| (name, g)));

    let Some((name, g)) = group else {
        log::debug!("{}/imposto/COFINS carries no recognized variant, skipping", path);
        return Ok(None);
    };
    map_contribution(TaxKind::Cofins, &format!("{}/imposto/COFINS/{}", path, name), g).map(Some)
}

fn map_contribution(kind: TaxKind, path: &str, group: &ContributionGroup) -> ImportResult<TaxDetail> {
    let (rate_tag, value_tag) = match kind {
        TaxKind::Cofins => ("pCOFINS", "vCOFINS"),
        _ => ("pPIS", "vPIS"),
    };

    Ok(TaxDetail {
        kind,
        situation_code: parse_situation_code(&format!("{}/CST", path), &group.cst)?,
        tax_base: parse_optional_decimal(&format!("{}/vBC", path), group.v_bc.as_deref())?,
        rate: parse_optional_decimal(&format!("{}/{}", path, rate_tag), group.rate.as_deref())?,
        amount: parse_optional_decimal(&format!("{}/{}", path, value_tag), group.value.as_deref())?
            .unwrap_or(Decimal::ZERO),
    })
}

fn map_icms(path: &str, icms: &Icms) -> ImportResult<Option<TaxDetail>> {
    let Some((name, group)) = icms.group() else {
        log::debug!("{}/imposto/ICMS carries no recognized variant, skipping", path);
        return Ok(None);
    };
    let path = format!("{}/imposto/ICMS/{}", path, name);

    let (code_tag, code) = match (&group.cst, &group.csosn) {
        (Some(cst), _) => ("CST", cst),
        (None, Some(csosn)) => ("CSOSN", csosn),
        (None, None) => {
            return Err(ImportError::malformed(format!(
                "missing mandatory element {}/CST",
                path
            )))
        }
    };

    Ok(Some(TaxDetail {
        kind: TaxKind::Icms,
        situation_code: parse_situation_code(&format!("{}/{}", path, code_tag), code)?,
        tax_base: parse_optional_decimal(&format!("{}/vBC", path), group.v_bc.as_deref())?,
        rate: parse_optional_decimal(&format!("{}/pICMS", path), group.p_icms.as_deref())?,
        amount: parse_optional_decimal(&format!("{}/vICMS", path), group.v_icms.as_deref())?
            .unwrap_or(Decimal::ZERO),
    }))
}

/// Situation codes are kept as written in the source (`"01"` stays `"01"`) but
/// must be numeric.
fn parse_situation_code(path: &str, raw: &str) -> ImportResult<String> {
    let code = raw.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ImportError::malformed(format!(
            "{}: expected a numeric situation code, got '{}'",
            path, raw
        )));
    }
    Ok(code.to_string())
}

fn parse_int(path: &str, raw: &str) -> ImportResult<i32> {
    raw.trim().parse::<i32>().map_err(|e| {
        ImportError::malformed(format!("{}: expected an integer, got '{}' ({})", path, raw, e))
    })
}

fn parse_decimal(path: &str, raw: &str) -> ImportResult<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| {
        ImportError::malformed(format!("{}: expected a decimal, got '{}' ({})", path, raw, e))
    })
}

fn parse_optional_decimal(path: &str, raw: Option<&str>) -> ImportResult<Option<Decimal>> {
    raw.map(|value| parse_decimal(path, value)).transpose()
}

fn parse_timestamp(path: &str, raw: &str) -> ImportResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).map_err(|e| {
        ImportError::malformed(format!("{}: expected an RFC 3339 timestamp, got '{}' ({})", path, raw, e))
    })
}
